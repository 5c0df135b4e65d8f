//! Module for the State Struct implementing the download options

use std::{
	ffi::OsString,
	path::PathBuf,
	sync::LazyLock,
};

use libytfetch::{
	chrono,
	options::{
		DownloadOptions,
		MediaKind,
	},
	spawn::ytdl::YTDL_BIN_NAME,
};

use crate::clap_conf::CommonDownloadArgs;

/// The default youtube-dl version to assume when the reported version could not be parsed
static DEFAULT_YTDL_VERSION: LazyLock<chrono::NaiveDate> =
	LazyLock::new(|| return chrono::NaiveDate::from_ymd_opt(2023, 3, 4).unwrap());

/// Struct to keep configuration data for the [`DownloadOptions`] trait
///
/// This data basically only contains non-chaning data between URLs
#[derive(Debug, PartialEq, Clone)]
pub struct DownloadState {
	/// What kind of media to download
	media_kind:              MediaKind,
	/// Download / embed subtitles (video) or lyrics (audio)
	subtitles:               bool,
	/// Let youtube-dl simulate the downloads
	simulate:                bool,
	/// Allow youtube-dl to overwrite existing files
	allow_overwrites:        bool,
	/// Explicit format selection, overriding the [`MediaKind`] default
	format_override:         Option<String>,
	/// Cookie file to pass to youtube-dl
	cookies:                 Option<PathBuf>,
	/// Path of the ffmpeg executable youtube-dl should use
	ffmpeg_location:         Option<PathBuf>,
	/// Extra arguments to pass to ytdl
	extra_command_arguments: Vec<OsString>,
	/// Print youtube-dl lines as trace logs
	print_command_log:       bool,
	/// The Path to download to (the temporary directory)
	download_path:           PathBuf,

	/// The current URL to be downloaded
	current_url: String,

	/// Stores the youtube-dl version in use
	ytdl_version: chrono::NaiveDate,
}

impl DownloadState {
	/// Create a new instance of [`DownloadState`] with the required options
	pub fn new(media_kind: MediaKind, sub_args: &CommonDownloadArgs, download_path: PathBuf, ytdl_version: &str) -> Self {
		// process extra arguments into separated arguments of key and value (split once)
		let extra_cmd_args = sub_args
			.extra_ytdl_args
			.iter()
			.flat_map(|v| {
				if let Some((split1, split2)) = v.split_once(' ') {
					return Vec::from([OsString::from(split1), OsString::from(split2)]);
				}
				return Vec::from([OsString::from(v)]);
			})
			.collect();

		let ytdl_version = chrono::NaiveDate::parse_from_str(ytdl_version, "%Y.%m.%d").unwrap_or_else(|_| {
			warn!("Could not determine {} version properly, using default", YTDL_BIN_NAME);

			return *DEFAULT_YTDL_VERSION;
		});

		return Self {
			media_kind,
			subtitles: !sub_args.no_subs,
			simulate: sub_args.simulate,
			allow_overwrites: sub_args.overwrite,
			format_override: sub_args.format_override.clone(),
			cookies: sub_args.cookies.clone(),
			ffmpeg_location: sub_args.ffmpeg_location.clone(),
			extra_command_arguments: extra_cmd_args,
			print_command_log: sub_args.print_youtubedl_log,
			download_path,

			current_url: String::default(),
			ytdl_version,
		};
	}

	/// Set the current url to be downloaded
	pub fn set_current_url<S: AsRef<str>>(&mut self, new_url: S) {
		// replace the already allocated string with the "new_url" without creating a new string
		self.current_url.replace_range(.., new_url.as_ref());
	}
}

impl DownloadOptions for DownloadState {
	fn media_kind(&self) -> MediaKind {
		return self.media_kind;
	}

	fn subtitles(&self) -> bool {
		return self.subtitles;
	}

	fn simulate(&self) -> bool {
		return self.simulate;
	}

	fn allow_overwrites(&self) -> bool {
		return self.allow_overwrites;
	}

	fn format_override(&self) -> Option<&str> {
		return self.format_override.as_deref();
	}

	fn cookies(&self) -> Option<&std::path::Path> {
		return self.cookies.as_deref();
	}

	fn ffmpeg_location(&self) -> Option<&std::path::Path> {
		return self.ffmpeg_location.as_deref();
	}

	fn download_path(&self) -> &std::path::Path {
		return self.download_path.as_path();
	}

	fn get_url(&self) -> &str {
		// check against "current_url" still being empty
		assert!(
			!self.current_url.is_empty(),
			"Expected \"current_url\" to not be empty at this point"
		);

		return &self.current_url;
	}

	fn extra_ytdl_arguments(&self) -> Vec<&std::ffi::OsStr> {
		return self
			.extra_command_arguments
			.iter()
			.map(|v| return v.as_os_str())
			.collect();
	}

	fn print_command_log(&self) -> bool {
		return self.print_command_log;
	}

	fn ytdl_version(&self) -> chrono::NaiveDate {
		return self.ytdl_version;
	}
}
