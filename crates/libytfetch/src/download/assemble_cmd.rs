use std::ffi::OsString;

use crate::{
	error::IOErrorToError as _,
	options::{
		DownloadOptions,
		MediaKind,
	},
};

/// The output template youtube-dl writes files with, inside the temporary directory
/// This format is also what [`crate::data::media_info::MediaInfo::try_from_filename`] parses
pub const OUTPUT_TEMPLATE: &str = "%(title)s - %(id)s.%(ext)s";

/// Internal Struct for easily adding various types that resolve to [`OsString`] and output a [`Vec<OsString>`]
/// exists because [std::process::Command] is too overkill to use for a argument collection for having to use [duct] later
#[derive(Debug)]
struct ArgsHelper(Vec<OsString>);
impl ArgsHelper {
	/// Create a new instance of ArgsHelper
	pub fn new() -> Self {
		return Self(Vec::default());
	}

	/// Add a new Argument to the list, added at the end and converted to a [`OsString`]
	/// Returns the input reference to "self" for chaining
	pub fn arg<U>(&mut self, arg: U) -> &mut Self
	where
		U: Into<OsString>,
	{
		self.0.push(arg.into());

		return self;
	}

	/// Convert Self to the inner value
	/// Consumes self
	pub fn into_inner(self) -> Vec<OsString> {
		return self.0;
	}
}

impl From<ArgsHelper> for Vec<OsString> {
	fn from(v: ArgsHelper) -> Self {
		return v.into_inner();
	}
}

/// Helper Function to assemble all ytdl command arguments
/// Returns a list of arguments for youtube-dl in order
#[inline]
pub fn assemble_ytdl_command<A: DownloadOptions>(options: &A) -> Result<Vec<OsString>, crate::Error> {
	let mut ytdl_args = ArgsHelper::new();

	let output_dir = options.download_path();
	debug!("YTDL Output dir is \"{}\"", output_dir.to_string_lossy());

	std::fs::create_dir_all(output_dir).attach_path_err(output_dir)?;

	// download into the temporary directory with a parseable name
	let output_format = output_dir.join(OUTPUT_TEMPLATE);

	add_format(&mut ytdl_args, options);

	// add metadata to the container if the container supports it
	ytdl_args.arg("--embed-metadata");

	add_subs(&mut ytdl_args, options);

	if !options.allow_overwrites() {
		// do not overwrite files that already exist in the download directory
		ytdl_args.arg("--no-overwrites");
	}

	if options.simulate() {
		// do not write any media files, only print what would be done
		ytdl_args.arg("--simulate");
	} else {
		// ensure it is not in simulate mode (for example set via extra arguments)
		ytdl_args.arg("--no-simulate");
	}

	if let Some(cookies) = options.cookies() {
		ytdl_args.arg("--cookies").arg(cookies);
	}

	if let Some(ffmpeg_location) = options.ffmpeg_location() {
		ytdl_args.arg("--ffmpeg-location").arg(ffmpeg_location);
	}

	// ensure ytdl is printing progress reports
	ytdl_args.arg("--progress");
	// ensure ytdl prints the progress reports on a new line
	ytdl_args.arg("--newline");

	// set the output directory for ytdl
	ytdl_args.arg("-o").arg(output_format);

	// apply all extra arguments
	for extra_arg in &options.extra_ytdl_arguments() {
		ytdl_args.arg(extra_arg);
	}

	// apply the url to download as the last argument
	ytdl_args.arg(options.get_url());

	return Ok(ytdl_args.into());
}

/// Add format selection and the per-kind post-processing arguments
fn add_format<A: DownloadOptions>(ytdl_args: &mut ArgsHelper, options: &A) {
	match options.media_kind() {
		MediaKind::Video { include_audio } => {
			match options.format_override() {
				Some(v) => ytdl_args.arg("-f").arg(v),
				None if include_audio => ytdl_args.arg("-f").arg("bestvideo+bestaudio/best"),
				// video-only download, do not merge any audio streams
				None => ytdl_args.arg("-f").arg("bestvideo"),
			};
		},
		MediaKind::Audio => {
			match options.format_override() {
				Some(v) => ytdl_args.arg("-f").arg(v),
				None => ytdl_args.arg("-f").arg("bestaudio/best"),
			};
			// set ytdl to always extract the audio, if it is not already audio-only
			ytdl_args.arg("-x");
			// set the output audio format and quality
			ytdl_args.arg("--audio-format").arg("mp3");
			ytdl_args.arg("--audio-quality").arg("320K");
		},
	}
}

/// Add subtitle arguments, if necessary
fn add_subs<A: DownloadOptions>(ytdl_args: &mut ArgsHelper, options: &A) {
	if !options.subtitles() {
		return;
	}

	// write subtitles as a separate file
	ytdl_args.arg("--write-subs");

	// download all available subtitle languages
	ytdl_args.arg("--sub-langs").arg("all");

	match options.media_kind() {
		MediaKind::Video { .. } => {
			// add subtitles directly into the downloaded file - if available
			ytdl_args.arg("--embed-subs");
		},
		MediaKind::Audio => {
			// convert subtitles to lyrics for audio downloads
			ytdl_args.arg("--convert-subs").arg("lrc");
		},
	}
}
