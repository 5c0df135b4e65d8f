//! Utils for the `ytfetch` binary

use crate::clap_conf::CliDerive;
use indicatif::{
	ProgressBar,
	ProgressDrawTarget,
};
use libytfetch::error::IOErrorToError;
use std::{
	borrow::Cow,
	io::BufRead,
	path::Path,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Helper function to set the progressbar to a draw target if mode is interactive
pub fn set_progressbar(bar: &ProgressBar, main_args: &CliDerive) {
	if main_args.is_interactive() {
		bar.set_draw_target(ProgressDrawTarget::stderr());
	}
}

/// Resolve all URL arguments into a flat URL list
/// A argument that points to a existing file is read as a URL list file, with one URL per line
/// Empty lines and whitespace-only lines are skipped
pub fn load_urls(args: &[String]) -> Result<Vec<String>, crate::Error> {
	let mut urls: Vec<String> = Vec::with_capacity(args.len());

	for arg in args {
		let path = Path::new(arg);

		if !path.is_file() {
			urls.push(arg.clone());
			continue;
		}

		info!("Argument \"{}\" is a file, reading it as a URL list", arg);

		let reader = std::io::BufReader::new(std::fs::File::open(path).attach_path_err(path)?);

		for line in reader.lines() {
			let line = line.attach_path_err(path)?;
			let line = line.trim();

			if line.is_empty() {
				continue;
			}

			urls.push(line.to_owned());
		}
	}

	return Ok(urls);
}

/// Truncate a given message to a maximum display width (not byte or character length)
/// When truncation happens and `add_ellipsis` is set, a trailing "..." (3 display columns) is included in the width
pub fn truncate_message_display_pos<'a, M>(msg: &'a M, max_width: usize, add_ellipsis: bool) -> Cow<'a, str>
where
	M: AsRef<str> + ?Sized,
{
	let msg = msg.as_ref();

	if UnicodeWidthStr::width(msg) <= max_width {
		return Cow::Borrowed(msg);
	}

	let keep_width = if add_ellipsis {
		max_width.saturating_sub(3)
	} else {
		max_width
	};

	let mut width = 0;
	let mut end_index = 0;

	// walk grapheme clusters, because a display position can only be cut at a cluster boundary
	for (index, grapheme) in msg.grapheme_indices(true) {
		let grapheme_width = UnicodeWidthStr::width(grapheme);

		if width + grapheme_width > keep_width {
			break;
		}

		width += grapheme_width;
		end_index = index + grapheme.len();
	}

	let mut truncated = msg[..end_index].to_owned();

	if add_ellipsis {
		truncated.push_str("...");
	}

	return Cow::Owned(truncated);
}

#[cfg(test)]
mod test {
	use super::*;

	mod load_urls {
		use super::*;
		use std::io::Write;
		use tempfile::Builder as TempBuilder;

		#[test]
		fn test_plain_urls() {
			let args = vec![
				"https://someurl.com/hello".to_owned(),
				"https://someurl.com/hello2".to_owned(),
			];

			assert_eq!(args, load_urls(&args).unwrap());
		}

		#[test]
		fn test_url_file() {
			let testdir = TempBuilder::new()
				.prefix("ytfetch-test-load_urls-")
				.tempdir()
				.expect("Expected a temp dir to be created");

			let file_path = testdir.as_ref().join("urls.txt");
			let mut file = std::fs::File::create(&file_path).unwrap();
			writeln!(file, "https://someurl.com/hello").unwrap();
			writeln!(file).unwrap();
			writeln!(file, "   ").unwrap();
			writeln!(file, "https://someurl.com/hello2").unwrap();
			drop(file);

			let args = vec![
				file_path.to_string_lossy().to_string(),
				"https://someurl.com/hello3".to_owned(),
			];

			assert_eq!(
				vec![
					"https://someurl.com/hello".to_owned(),
					"https://someurl.com/hello2".to_owned(),
					"https://someurl.com/hello3".to_owned(),
				],
				load_urls(&args).unwrap()
			);
		}
	}

	mod truncate_message_display_pos {
		use super::*;

		#[test]
		fn test_no_truncation() {
			assert_eq!("hello", truncate_message_display_pos("hello", 10, true));
			assert_eq!("hello", truncate_message_display_pos("hello", 5, true));
		}

		#[test]
		fn test_truncation_ascii() {
			assert_eq!("hello w...", truncate_message_display_pos("hello world!", 10, true));
			assert_eq!("hello worl", truncate_message_display_pos("hello world!", 10, false));
		}

		#[test]
		fn test_truncation_wide_characters() {
			// every character is 2 display columns wide
			let input = "ラウドネステスト";

			// 7 columns available, 4 for content (cannot cut a 2-wide character in half), 3 for the ellipsis
			assert_eq!("ラウ...", truncate_message_display_pos(input, 7, true));
		}
	}
}
