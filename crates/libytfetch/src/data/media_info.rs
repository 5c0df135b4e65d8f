//! Module containing [`MediaInfo`]

use regex::Regex;
use serde::{
	Deserialize,
	Serialize,
};
use std::{
	path::{
		Path,
		PathBuf,
	},
	sync::LazyLock,
};

/// Contains Information about a single downloaded media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
	/// The ID of the media
	pub id:       String,
	/// The title of the media, may differ from "filename"
	pub title:    Option<String>,
	/// The file-name of the media inside the temporary download directory
	pub filename: Option<PathBuf>,
}

impl MediaInfo {
	/// Create a new instance of [`MediaInfo`]
	pub fn new<I: AsRef<str>>(id: I) -> Self {
		return Self {
			id:       id.as_ref().into(),
			title:    None,
			filename: None,
		};
	}

	/// Builder function to add a title
	pub fn with_title<T: AsRef<str>>(mut self, title: T) -> Self {
		self.title = Some(title.as_ref().into());

		return self;
	}

	/// Builder function to add a filename
	pub fn with_filename<F: AsRef<Path>>(mut self, filename: F) -> Self {
		self.filename = Some(filename.as_ref().into());

		return self;
	}

	/// Set the filename of the current [`MediaInfo`]
	pub fn set_filename<F: AsRef<Path>>(&mut self, filename: F) {
		self.filename = Some(filename.as_ref().into());
	}

	/// Try to create a [`MediaInfo`] instance from a filename
	/// Parsed based on the output template defined in [`crate::download::assemble_ytdl_command`]
	/// Only accepts a str input, not a path one
	pub fn try_from_filename<I: AsRef<str>>(filename: &I) -> Option<Self> {
		/// Regex for getting the title and id from a filename (as defined in [`crate::download::assemble_ytdl_command`])
		/// cap1: title, cap2: id
		static FROM_PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?mi)^(.+) - (\S+)$").unwrap();
		});

		let filename = filename.as_ref();

		let path = Path::new(&filename);

		// "file_stem" can be safely used here, because only one extension is expected
		// eg ".mkv" but not ".tar.gz"
		let filestem = path
			.file_stem()?
			// ignore all files that cannot be transformed to a str
			.to_str()?;

		let cap = FROM_PATH_REGEX.captures(filestem)?;

		return Some(Self::new(&cap[2]).with_title(&cap[1]).with_filename(filename));
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use serde_test::{
		Token,
		assert_tokens,
	};

	#[test]
	fn test_new() {
		assert_eq!(
			MediaInfo {
				id:       "".to_owned(),
				title:    None,
				filename: None,
			},
			MediaInfo::new("")
		);

		assert_eq!(
			MediaInfo {
				id:       "hello".to_owned(),
				title:    None,
				filename: None,
			},
			MediaInfo::new("hello")
		);
	}

	#[test]
	fn test_with_title() {
		assert_eq!(
			MediaInfo {
				id:       "someid".to_owned(),
				title:    Some("Hello".to_owned()),
				filename: None,
			},
			MediaInfo::new("someid").with_title("Hello")
		);
	}

	#[test]
	fn test_with_filename() {
		assert_eq!(
			MediaInfo {
				id:       "someid".to_owned(),
				title:    None,
				filename: Some(PathBuf::from("Hello")),
			},
			MediaInfo::new("someid").with_filename("Hello")
		);
	}

	#[test]
	fn test_try_from_filename() {
		// test a non-proper name
		let input = "impropername.something";
		assert_eq!(None, MediaInfo::try_from_filename(&input));

		// test a proper name
		let input = "Some Title - abc123DEF45.mkv";
		assert_eq!(
			Some(
				MediaInfo::new("abc123DEF45")
					.with_title("Some Title")
					.with_filename("Some Title - abc123DEF45.mkv")
			),
			MediaInfo::try_from_filename(&input)
		);

		// test a title containing the separator itself; the last one wins
		let input = "Artist - Song - xyz987.mp3";
		assert_eq!(
			Some(
				MediaInfo::new("xyz987")
					.with_title("Artist - Song")
					.with_filename("Artist - Song - xyz987.mp3")
			),
			MediaInfo::try_from_filename(&input)
		);
	}

	#[test]
	fn test_serde() {
		let media = MediaInfo::new("someid").with_title("Some Title");

		assert_tokens(
			&media,
			&[
				Token::Struct {
					name: "MediaInfo",
					len:  3,
				},
				Token::Str("id"),
				Token::Str("someid"),
				Token::Str("title"),
				Token::Some,
				Token::Str("Some Title"),
				Token::Str("filename"),
				Token::None,
				Token::StructEnd,
			],
		);
	}
}
