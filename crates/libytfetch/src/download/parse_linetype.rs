use std::{
	collections::HashSet,
	path::PathBuf,
	sync::LazyLock,
};

use regex::Regex;

/// A parsed snapshot of a youtube-dl download progress line
/// The size / speed / eta fields are kept as the textual values youtube-dl printed
#[derive(Debug, PartialEq, Clone)]
pub struct ProgressSnapshot {
	/// Download progress in whole percent (0-100)
	pub percent: u8,
	/// Total (or estimated) size of the current download, like "78.44MiB"
	pub size:    Option<String>,
	/// Current download speed, like "526.19KiB/s"
	pub speed:   Option<String>,
	/// Estimated remaining time, like "01:16"
	pub eta:     Option<String>,
}

/// Names inside the bracket-prefix that indicate a post-processing line (transcode, merge, embed)
static POSTPROCESS_NAMES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
	return HashSet::from([
		"ffmpeg",
		"merger",
		"extractaudio",
		"embedthumbnail",
		"thumbnailsconvertor",
		"metadata",
		"embedsubtitle",
		"subtitlesconvertor",
		"videoremuxer",
		"videoconvertor",
		"movefiles",
		"fixupm3u8",
		"fixupm4a",
	]);
});

/// Line type for a ytdl output line
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LineType {
	/// Variant for ytdl download progress lines
	Download,
	/// Variant for post-processing lines (ffmpeg, merging, audio extraction, embedding)
	PostProcess,
	/// Variant for provider specific lines (like youtube counting website)
	ProviderSpecific,
	/// Variant for generic lines (like "Deleting original file")
	Generic,
	/// Variant for lines that start with "ERROR:"
	Error,
	/// Variant for lines that start with "WARNING:"
	Warning,
}

impl LineType {
	/// Try to get the correct Variant for a input line
	/// Will return [`None`] if no type has been found
	pub fn try_from_line(input: &str) -> Option<Self> {
		/// basic regex to test if the line is "[something] something", and if it is, return what is inside "[]"
		static BASIC_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?mi)^\[([\da-z:_]*)\]").unwrap();
		});
		/// regex to check for generic lines
		static GENERIC_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?mi)^deleting original file").unwrap();
		});

		// check if the line is from a provider-like output
		if let Some(cap) = BASIC_TYPE_REGEX.captures(input) {
			let name = cap[1].to_lowercase();

			// this case is first, because it is the most common case
			if name == "download" {
				return Some(Self::Download);
			}

			if POSTPROCESS_NAMES.contains(name.as_str()) {
				return Some(Self::PostProcess);
			}

			// everything that is not specially handled before, will get treated as being a provider
			return Some(Self::ProviderSpecific);
		}

		// check for Generic lines that dont have a prefix
		if GENERIC_TYPE_REGEX.is_match(input) {
			return Some(Self::Generic);
		}

		if input.starts_with("ERROR:") {
			return Some(Self::Error);
		}

		if input.starts_with("yt-dlp: error:") || input.starts_with("youtube-dl: error:") {
			return Some(Self::Error);
		}

		if input.starts_with("WARNING:") {
			return Some(Self::Warning);
		}

		// if nothing above matches, return None, because no type has been found
		return None;
	}

	/// Try to get a [`ProgressSnapshot`] from the input
	/// Returns [`None`] if not being of variant [`LineType::Download`], if no percentage can be found or if it could not be parsed
	pub fn try_get_progress<I: AsRef<str>>(&self, input: I) -> Option<ProgressSnapshot> {
		// this function only works with Download lines
		if self != &Self::Download {
			return None;
		}

		/// Regex to parse a download progress line
		/// cap1: percentage (not decimal), cap2: total size, cap3: speed, cap4: eta
		static DOWNLOAD_PROGRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(
				r"(?mi)^\[download\]\s+(\d{1,3})(?:\.\d+)?%\s+of\s+~?\s*(\S+)(?:\s+at\s+(.+?))?(?:\s+ETA\s+(\S+))?(?:\s+in\s+[\d:]+)?(?:\s+\(frag\s+\d+/\d+\))?$",
			)
			.unwrap();
		});

		let input = input.as_ref();

		let cap = DOWNLOAD_PROGRESS_REGEX.captures(input)?;

		// directly use the "Result" returned by "parse" and convert it to a "Option"
		let percent = cap[1].parse::<u8>().ok()?;

		return Some(ProgressSnapshot {
			percent,
			size: cap.get(2).map(|v| return v.as_str().to_owned()),
			speed: cap.get(3).map(|v| return v.as_str().to_owned()),
			eta: cap.get(4).map(|v| return v.as_str().to_owned()),
		});
	}

	/// Try to get the destination file path from a "Destination:" or "Merging formats into" line
	/// Returns [`None`] if not being of variant [`LineType::Download`] / [`LineType::PostProcess`] or if the line carries no path
	pub fn try_get_destination<I: AsRef<str>>(&self, input: I) -> Option<PathBuf> {
		// this function only works with Download and PostProcess lines
		if self != &Self::Download && self != &Self::PostProcess {
			return None;
		}

		/// Regex to get the path from a "[] Destination: ..." line
		/// cap1: path
		static DESTINATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?mi)^\[[\da-z:_]+\] Destination: (.+)$").unwrap();
		});
		/// Regex to get the path from a "[Merger] Merging formats into ..." line
		/// cap1: path
		static MERGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r#"(?mi)^\[Merger\] Merging formats into "(.+)"$"#).unwrap();
		});

		let input = input.as_ref();

		if let Some(cap) = DESTINATION_REGEX.captures(input) {
			return Some(PathBuf::from(&cap[1]));
		}

		if let Some(cap) = MERGE_REGEX.captures(input) {
			return Some(PathBuf::from(&cap[1]));
		}

		return None;
	}
}
