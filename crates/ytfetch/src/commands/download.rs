use crate::{
	clap_conf::{
		CliDerive,
		CommonDownloadArgs,
	},
	state::DownloadState,
	utils,
};
use colored::{
	Color,
	Colorize,
};
use indicatif::{
	ProgressBar,
	ProgressStyle,
};
use libytfetch::{
	download::{
		DownloadProgress,
		ProgressSnapshot,
		download_url,
		inspect,
		move_finished,
	},
	error::IOErrorToError,
	options::{
		DownloadOptions,
		MediaKind,
	},
	report::{
		ReportEntry,
		RunReport,
	},
	spawn::ytdl::require_ytdl_installed,
};
use std::{
	path::{
		Path,
		PathBuf,
	},
	sync::LazyLock,
	time::Duration,
};

/// Static for easily referencing the 100% length for a progressbar
const PG_PERCENT_100: u64 = 100;
/// Static size the Download Progress Style will take (plus some spacers)
/// currently accounts for `[00/00] [00:00:00] ### `
const STYLE_STATIC_SIZE: usize = 23;

/// ProgressBar Style for download, will look like `[0/0] [00:00:00] [#>-] CustomMsg`
static DOWNLOAD_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
	return ProgressStyle::default_bar()
		.template("{prefix:.dim} [{elapsed_precise}] {wide_bar:.cyan/blue} {msg}")
		.expect("Expected ProgressStyle template to be valid")
		.progress_chars("#>-");
});

/// Truncate the given message to a lower size so that the progressbar does not do new-lines
/// truncation is required because indicatif would do new-lines, and adding truncation would only work with a (static) maximum size
fn truncate_message_term_width<M>(msg: &M) -> String
where
	M: AsRef<str>,
{
	let display_width_available = terminal_size::terminal_size().map(|(w, _h)| {
		return (w.0 as usize).saturating_sub(STYLE_STATIC_SIZE);
	});

	let Some(display_width_available) = display_width_available else {
		return msg.as_ref().into();
	};

	return utils::truncate_message_display_pos(msg.as_ref(), display_width_available, true).to_string();
}

/// Assemble the textual stats of a progress snapshot, like "78.44MiB at 5.89MiB/s ETA 00:10"
/// Returns [None] when the snapshot carries no textual fields
fn assemble_progress_stats(snapshot: &ProgressSnapshot) -> Option<String> {
	let mut parts: Vec<String> = Vec::new();

	if let Some(size) = &snapshot.size {
		parts.push(size.clone());
	}
	if let Some(speed) = &snapshot.speed {
		parts.push(format!("at {}", speed));
	}
	if let Some(eta) = &snapshot.eta {
		parts.push(format!("ETA {}", eta));
	}

	if parts.is_empty() {
		return None;
	}

	return Some(parts.join(" "));
}

/// Handler function for the "video" and "audio" subcommands
/// This function is mainly to keep the code structured and sorted
#[inline]
pub fn command_download(
	main_args: &CliDerive,
	media_kind: MediaKind,
	sub_args: &CommonDownloadArgs,
) -> Result<(), crate::Error> {
	let ytdl_version = require_ytdl_installed(sub_args.ffmpeg_location.as_deref())?;

	let urls = utils::load_urls(&sub_args.urls)?;

	if urls.is_empty() {
		return Err(crate::Error::other("At least one URL is required"));
	}

	let tmp_path = main_args
		.tmp_path
		.as_ref()
		.map_or_else(|| return std::env::temp_dir(), |v| return v.clone())
		.join("ytfetch_tmp");
	std::fs::create_dir_all(&tmp_path).attach_path_err(&tmp_path)?;

	let out_path = sub_args.output_path.as_ref().map_or_else(
		|| {
			return dirs::download_dir()
				.unwrap_or_else(|| return PathBuf::from("."))
				.join("ytfetch");
		},
		|v| return v.clone(),
	);
	std::fs::create_dir_all(&out_path).attach_path_err(&out_path)?;

	let mut download_state = DownloadState::new(media_kind, sub_args, tmp_path.clone(), &ytdl_version);

	let pgbar: ProgressBar = ProgressBar::hidden().with_style(DOWNLOAD_STYLE.clone());
	utils::set_progressbar(&pgbar, main_args);

	let mut report = RunReport::new();
	let url_len = urls.len();

	for (index, url) in urls.iter().enumerate() {
		// handle terminate
		crate::check_termination()?;

		// index plus one, to match .len, to not have 0-index for display
		let index_p = index + 1;

		pgbar.set_prefix(format!("[{}/{}]", index_p, url_len));
		println!("Processing \"{}\" ({}/{})", url, index_p, url_len);

		process_url(
			main_args,
			sub_args,
			media_kind,
			&mut download_state,
			&pgbar,
			&out_path,
			url,
			&mut report,
		);
	}

	print_report(&report);

	if !report.has_failures() && !sub_args.simulate {
		// the tmp directory only contains leftovers when something failed
		std::fs::remove_dir_all(&tmp_path).attach_path_err(&tmp_path)?;
	}

	if report.has_failures() {
		warn!("Exiting with non-zero code, because of failed downloads");
		std::process::exit(1);
	}

	return Ok(());
}

/// Process a single URL from inspection to the final file move, recording the outcome in `report`
#[allow(clippy::too_many_arguments)]
fn process_url(
	main_args: &CliDerive,
	sub_args: &CommonDownloadArgs,
	media_kind: MediaKind,
	download_state: &mut DownloadState,
	pgbar: &ProgressBar,
	out_path: &Path,
	url: &str,
	report: &mut RunReport,
) {
	let url_info = match inspect::inspect_url(url, sub_args.cookies.as_deref()) {
		Ok(v) => v,
		Err(err) => {
			println!("A youtube-dl error occured while inspecting the URL:\n\t{}", err);
			report.record_failed(ReportEntry::new(url, "N/A"));
			return;
		},
	};

	let title = url_info.display_title().to_owned();
	let kind_name = if media_kind.is_audio_only() { "audio" } else { "video" };

	match url_info.entry_count() {
		Some(count) => println!(
			"Downloading {} playlist \"{}\" ({} entries, ID: {})",
			kind_name, title, count, url_info.id
		),
		None => println!("Downloading {} \"{}\" (ID: {})", kind_name, title, url_info.id),
	}

	// check whether a file with the same ID has already been downloaded by a earlier run
	match move_finished::find_downloaded_by_id(out_path, &url_info.id) {
		Ok(Some(existing)) => {
			info!("Skipping URL, because its ID was found in the output directory");
			println!("File is already downloaded (\"{}\"), skipping", existing.to_string_lossy());
			report.record_skipped(ReportEntry::new(url, title));
			return;
		},
		Ok(None) => (),
		Err(err) => {
			println!("Checking the output directory failed:\n\t{}", err);
			report.record_failed(ReportEntry::new(url, title));
			return;
		},
	}

	download_state.set_current_url(url);

	let is_interactive = main_args.is_interactive();

	// print a message either above the progressbar or plainly, depending on the mode
	let bar_println = |msg: String| {
		if is_interactive {
			pgbar.println(msg);
		} else {
			println!("{}", msg);
		}
	};

	pgbar.reset();
	pgbar.set_length(PG_PERCENT_100);
	pgbar.set_message(truncate_message_term_width(&title));

	let download_pgcb = |dpg| match dpg {
		DownloadProgress::UrlStarting => {
			pgbar.reset();
			// steady-ticks have to be re-done after every "pgbar.finish" because the ticker will exit once it notices the state is "finished"
			pgbar.enable_steady_tick(Duration::from_secs(1));
		},
		DownloadProgress::Progress(snapshot) => {
			pgbar.set_position(u64::from(snapshot.percent));

			let message = match assemble_progress_stats(&snapshot) {
				Some(stats) => format!("{} | {}", stats, title),
				None => title.clone(),
			};
			pgbar.set_message(truncate_message_term_width(&message));
		},
		DownloadProgress::PostProcessing => {
			// reset the message, because the last progress stats are of a finished download
			pgbar.set_message(truncate_message_term_width(&title));
			bar_println(format!("Post-processing \"{}\"", title));
		},
		DownloadProgress::UrlFinished(count) => {
			pgbar.finish_and_clear();
			bar_println(format!("Finished downloading {} file(s) for \"{}\"", count, title));
		},
	};

	let res = download_url(&*download_state, download_pgcb);

	pgbar.finish_and_clear();

	match res {
		Ok(media_files) => {
			debug!("youtube-dl reported {} media files", media_files.len());

			if sub_args.simulate {
				info!("Simulation only, skipping the file movement process");
				report.record_success(ReportEntry::new(url, title));
				return;
			}

			match move_finished::move_finished_files(download_state.download_path(), out_path, &url_info.id) {
				Ok(moved) => {
					println!("Moved {} file(s) to \"{}\"", moved.len(), out_path.to_string_lossy());
					report.record_success(ReportEntry::new(url, title));
				},
				Err(err) => {
					println!("Moving the finished files failed:\n\t{}", err);
					report.record_failed(ReportEntry::new(url, title));
				},
			}
		},
		Err(err) => {
			println!("A youtube-dl error occured:\n\t{}", err);
			report.record_failed(ReportEntry::new(url, title));
		},
	}
}

/// Print the result overview of a full run
fn print_report(report: &RunReport) {
	println!();
	println!("==================== Results ====================");

	if !report.success().is_empty() {
		println!();
		println!("Completed downloads:");
		for entry in report.success() {
			println!("    {} {} ({})", "+".color(Color::Green), entry.url, entry.title);
		}
	}

	if !report.failed().is_empty() {
		println!();
		println!("Failed downloads:");
		for entry in report.failed() {
			println!("    {} {} ({})", "-".color(Color::Red), entry.url, entry.title);
		}
	}

	if !report.skipped().is_empty() {
		println!();
		println!("Skipped downloads:");
		for entry in report.skipped() {
			println!("    {} {} ({})", "*".color(Color::Yellow), entry.url, entry.title);
		}
	}

	println!();
	println!("=================================================");
}
