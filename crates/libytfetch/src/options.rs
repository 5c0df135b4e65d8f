//! Module for the options trait the download functions consume

use std::{
	ffi::OsStr,
	path::Path,
};

/// What kind of media a download should produce
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaKind {
	/// Download the best video, optionally merged with the best audio
	Video {
		/// Also download / merge the audio streams
		include_audio: bool,
	},
	/// Download the best audio only and extract / transcode it to mp3
	Audio,
}

impl MediaKind {
	/// Get whether this kind only produces audio files
	#[must_use]
	pub fn is_audio_only(&self) -> bool {
		return matches!(self, Self::Audio);
	}
}

/// Options specific for the [`crate::download::download_url`] function
pub trait DownloadOptions {
	/// Get what kind of media should be downloaded
	fn media_kind(&self) -> MediaKind;
	/// Get whether subtitles (video) or lyrics (audio) should be downloaded and embedded
	fn subtitles(&self) -> bool;
	/// Get whether youtube-dl should only simulate the download, without writing any media files
	fn simulate(&self) -> bool;
	/// Get whether youtube-dl is allowed to overwrite already existing files
	fn allow_overwrites(&self) -> bool;
	/// Get a explicit format-selection string, overriding the [`MediaKind`] default
	fn format_override(&self) -> Option<&str>;
	/// Get the cookie file to pass to youtube-dl
	fn cookies(&self) -> Option<&Path>;
	/// Get the path of the ffmpeg executable youtube-dl should use
	/// [None] means youtube-dl resolves ffmpeg from the PATH itself
	fn ffmpeg_location(&self) -> Option<&Path>;
	/// Get the path to where the media should be downloaded to (the temporary directory)
	fn download_path(&self) -> &Path;
	/// Get the URL to download
	fn get_url(&self) -> &str;
	/// Get Extra Arguments that should be added to the ytdl command
	fn extra_ytdl_arguments(&self) -> Vec<&OsStr>;
	/// Get whether to print youtube-dl output lines
	/// With this returning `true`, the output is printed with [`log::trace`]
	fn print_command_log(&self) -> bool;
	/// Get the version of the youtube-dl binary in use
	fn ytdl_version(&self) -> chrono::NaiveDate;
}
