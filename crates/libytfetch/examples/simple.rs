use std::path::Path;

use libytfetch::{
	chrono::NaiveDate,
	download::{
		MINIMAL_YTDL_VERSION,
		DownloadProgress,
		download_url,
	},
	options::{
		DownloadOptions,
		MediaKind,
	},
	spawn::ytdl::{
		require_ytdl_installed,
		ytdl_parse_version_naivedate,
	},
};

struct Options {
	ytdl_version: NaiveDate,
	url:          String,
	// ... fields corresponding to the trait impl below
}

impl DownloadOptions for Options {
	fn media_kind(&self) -> MediaKind {
		return MediaKind::Video { include_audio: true };
	}

	fn subtitles(&self) -> bool {
		return false;
	}

	fn simulate(&self) -> bool {
		return false;
	}

	fn allow_overwrites(&self) -> bool {
		return false;
	}

	fn format_override(&self) -> Option<&str> {
		return None;
	}

	fn cookies(&self) -> Option<&Path> {
		return None;
	}

	fn ffmpeg_location(&self) -> Option<&Path> {
		return None;
	}

	fn download_path(&self) -> &Path {
		return Path::new("/tmp/download");
	}

	fn get_url(&self) -> &str {
		return &self.url;
	}

	fn extra_ytdl_arguments(&self) -> Vec<&std::ffi::OsStr> {
		return Vec::new();
	}

	fn print_command_log(&self) -> bool {
		return false;
	}

	fn ytdl_version(&self) -> NaiveDate {
		return self.ytdl_version;
	}
}

fn progress_callback(event: DownloadProgress) {
	match event {
		DownloadProgress::UrlStarting => println!("Starting URL"),
		DownloadProgress::Progress(snapshot) => {
			println!(
				"Progress {}% of {}",
				snapshot.percent,
				snapshot.size.unwrap_or("??".into())
			);
		},
		DownloadProgress::PostProcessing => println!("Post-processing"),
		DownloadProgress::UrlFinished(count) => println!("Finished URL; Downloaded {count} media"),
	}
}

fn main() -> Result<(), libytfetch::Error> {
	let ytdl_version = require_ytdl_installed(None)?;

	let ytdl_version = ytdl_parse_version_naivedate(&ytdl_version).unwrap_or_else(|_| {
		eprintln!("Could not determine youtube-dl version properly, using default");

		return MINIMAL_YTDL_VERSION;
	});

	let mut args = std::env::args();

	let _ = args.next();

	let url = args.next().expect("Expected a URL as a argument");

	assert!(!url.is_empty(), "Given URL is empty!");

	let options = Options { ytdl_version, url };

	let result_vec = download_url(&options, progress_callback)?;

	println!("Finished downloading everything, all media: {result_vec:#?}");

	return Ok(());
}
