//! Module for invoking youtube-dl and watching its output

use std::{
	io::{
		BufRead,
		BufReader,
	},
	path::Path,
	sync::LazyLock,
	time::Duration,
};

use chrono::NaiveDate;
use regex::Regex;

use crate::{
	data::media_info::MediaInfo,
	error::IOErrorToError,
	options::DownloadOptions,
	spawn::ytdl::YTDL_BIN_NAME,
};

pub use assemble_cmd::{
	OUTPUT_TEMPLATE,
	assemble_ytdl_command,
};
pub use parse_linetype::{
	LineType,
	ProgressSnapshot,
};

mod assemble_cmd;
pub mod inspect;
pub mod move_finished;
mod parse_linetype;

/// The minimal youtube-dl(p) version that is expected to be used.
///
/// Newer versions can be used to likely unlock extra functionality, but ytfetch is build around this as the minimal in mind.
pub const MINIMAL_YTDL_VERSION: chrono::NaiveDate = chrono::NaiveDate::from_ymd_opt(2023, 3, 3).unwrap();

/// Enum for hooks to know what is currently happening
/// All Variants have a certian order in which they are called ([`UrlStarting`](DownloadProgress::UrlStarting) is always first, [`UrlFinished`](DownloadProgress::UrlFinished) always last)
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadProgress {
	/// Variant representing that the download of a url is starting
	UrlStarting,
	/// Variant representing a new progress report for the current file
	/// values: (snapshot)
	Progress(ProgressSnapshot),
	/// Variant representing that the downloaded file has entered post-processing (merging, transcoding, embedding)
	PostProcessing,
	/// Variant representing that the download of a url has finished
	/// The value in this tuple is the count of downloaded files
	/// values: (downloaded media count)
	UrlFinished(usize),
}

/// Warn if a version lower than the minimal is used
fn warn_minimal_version(ytdl_version: NaiveDate) {
	if ytdl_version < MINIMAL_YTDL_VERSION {
		warn!(
			"Used {} version ({}) is lower than the recommended minimal {}",
			YTDL_BIN_NAME,
			ytdl_version.format("%Y.%m.%d"),
			MINIMAL_YTDL_VERSION.format("%Y.%m.%d"),
		);
	}
}

/// Download a single URL
/// Assumes ytdl and ffmpeg have already been checked to exist and work (like using [`crate::spawn::ytdl::require_ytdl_installed`])
/// Returns all media files that youtube-dl reported as written
pub fn download_url<A: DownloadOptions, C: FnMut(DownloadProgress)>(
	options: &A,
	pgcb: C,
) -> Result<Vec<MediaInfo>, crate::Error> {
	warn_minimal_version(options.ytdl_version());

	let ytdl_child = {
		let args = assemble_ytdl_command(options)?;

		// merge stderr into stdout
		duct::cmd(YTDL_BIN_NAME, args)
			.stderr_to_stdout()
			.reader()
			.attach_location_err("duct ytdl reader")?
	};

	let stdout_reader = BufReader::new(&ytdl_child);

	let mut mediainfo_vec: Vec<MediaInfo> = Vec::new();

	handle_stdout(options, pgcb, stdout_reader, &mut mediainfo_vec)?;

	loop {
		// wait loop, because somehow a "ReaderHandle" does not implement "wait", only "try_wait", but have to wait for it to exit here
		match ytdl_child.try_wait() {
			Ok(v) => {
				// only in the "Some" case is the wait actually finished
				if v.is_some() {
					break;
				}
			},
			Err(err) => {
				// ignore duct errors as non-"Err" worthy
				warn!("youtube-dl exited with a non-0 code: {err}");
				break;
			},
		}

		std::thread::sleep(Duration::from_millis(100)); // sleep to same some time between the next wait (to not cause constant cpu spike)
	}

	return Ok(mediainfo_vec);
}

/// Helper function to handle the output from a spawned ytdl command
/// Adds all media that youtube-dl reported a destination for to the input [`Vec<MediaInfo>`]
#[inline]
fn handle_stdout<A: DownloadOptions, C: FnMut(DownloadProgress), R: BufRead>(
	options: &A,
	mut pgcb: C,
	reader: R,
	mediainfo_vec: &mut Vec<MediaInfo>,
) -> Result<(), crate::Error> {
	// report that the downloading is now starting
	pgcb(DownloadProgress::UrlStarting);

	// cache the bool for "print_command_log" to not execute the function for every line (should be a static value)
	let print_stdout = options.print_command_log();

	// store the last error line encountered
	let mut last_error = None;
	// whether the previous classified line was a post-process line, to only report the transition
	let mut in_postprocess = false;

	// HACK: .lines() iter never exits on non-0 exit codes in duct, see https://github.com/oconnor663/duct.rs/issues/112
	for line in reader.lines() {
		let line = match line {
			Ok(v) => v,
			Err(err) => {
				debug!("duct lines reader errored: {}", err);
				break; // handle it as a non-breaking case, because in 99% of cases it is just a error of "command ... exited with code ?"
			},
		};

		// only print STDOUT to output when requested
		if print_stdout {
			trace!("ytdl [STDOUT]: \"{}\"", line);
		}

		if let Some(linetype) = LineType::try_from_line(&line) {
			// clear last_error once the linetype is not error anymore (like in a playlist where only a single media failed)
			if linetype != LineType::Error {
				last_error = None;
			}
			match linetype {
				LineType::Download => {
					in_postprocess = false;
					if let Some(snapshot) = linetype.try_get_progress(&line) {
						pgcb(DownloadProgress::Progress(snapshot));
					} else if let Some(destination) = linetype.try_get_destination(&line) {
						record_destination(mediainfo_vec, &destination);
					}
				},
				LineType::PostProcess => {
					if !in_postprocess {
						in_postprocess = true;
						pgcb(DownloadProgress::PostProcessing);
					}
					// post-processors report the final file name (like after audio extraction or merging)
					if let Some(destination) = linetype.try_get_destination(&line) {
						record_destination(mediainfo_vec, &destination);
					}
				},
				// currently there is nothing that needs to be done with "ProviderSpecific" or "Generic" Lines
				LineType::ProviderSpecific | LineType::Generic => (),
				LineType::Error => {
					// the following is using debug printing, because the line may include escape characters, which would mess-up the printing, but is still good to know when reading
					warn!("Encountered youtube-dl error: {:#?}", line);
					last_error = Some(crate::Error::other(line));
				},
				LineType::Warning => {
					// ytdl warnings are non-fatal, but should still be logged
					warn!("youtube-dl: {:#?}", line);
				},
			}
		} else if !line.is_empty() {
			info!("No type has been found for line \"{}\"", line);
		}
	}

	// report that downloading is now finished
	pgcb(DownloadProgress::UrlFinished(mediainfo_vec.len()));

	if let Some(last_error) = last_error {
		return Err(last_error);
	}

	return Ok(());
}

/// Record a destination path reported by youtube-dl into the [`MediaInfo`] list
/// Later destinations for the same media id update the filename (like after audio extraction)
fn record_destination(mediainfo_vec: &mut Vec<MediaInfo>, destination: &Path) {
	/// Regex to strip intermediate format-id suffixes (like "someid.f616") from a parsed id
	/// cap1: id without the format suffix
	static FORMAT_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
		return Regex::new(r"(?m)^(.+)\.f\d+$").unwrap();
	});

	let Some(file_name) = destination.file_name().and_then(|v| return v.to_str()) else {
		info!("Destination path from youtube-dl did not have a file_name!");
		return;
	};

	let Some(mut mediainfo) = MediaInfo::try_from_filename(&file_name) else {
		debug!("Destination file name did not match the output template: \"{}\"", file_name);
		return;
	};

	// pre-merge video / audio streams are written as "id.fNNN" files, which all belong to the same media
	let stripped_id = FORMAT_SUFFIX_REGEX
		.captures(&mediainfo.id)
		.map(|cap| return cap[1].to_owned());
	if let Some(stripped_id) = stripped_id {
		mediainfo.id = stripped_id;
	}

	match mediainfo_vec.iter_mut().find(|v| return v.id == mediainfo.id) {
		Some(existing) => existing.set_filename(file_name),
		None => mediainfo_vec.push(mediainfo),
	}
}


#[cfg(test)]
mod test {
	use std::sync::Arc;
	use std::sync::atomic::AtomicUsize;

	use super::*;

	mod handle_stdout {
		use test_utils::{
			TestOptions,
			callback_counter,
		};

		use super::*;

		/// Helper to create a [`ProgressSnapshot`] without having to repeat all the field names
		fn snapshot(percent: u8, size: &str, speed: Option<&str>, eta: Option<&str>) -> DownloadProgress {
			return DownloadProgress::Progress(ProgressSnapshot {
				percent,
				size: Some(size.to_owned()),
				speed: speed.map(|v| return v.to_owned()),
				eta: eta.map(|v| return v.to_owned()),
			});
		}

		#[test]
		fn test_basic_video_usage() {
			let expected_pg = &vec![
				DownloadProgress::UrlStarting,
				snapshot(0, "78.44MiB", Some("207.76KiB/s"), Some("06:27")),
				snapshot(50, "78.44MiB", Some("526.19KiB/s"), Some("01:16")),
				snapshot(100, "78.44MiB", Some("5.89MiB/s"), Some("00:00")),
				snapshot(100, "78.44MiB", None, None),
				snapshot(0, "3.47MiB", Some("196.76KiB/s"), Some("00:18")),
				snapshot(57, "3.47MiB", Some("9.57MiB/s"), Some("00:00")),
				snapshot(100, "3.47MiB", Some("10.57MiB/s"), Some("00:00")),
				snapshot(100, "3.47MiB", None, None),
				DownloadProgress::PostProcessing,
				DownloadProgress::UrlFinished(1),
			];
			let expect_index = Arc::new(AtomicUsize::new(0));

			let options = TestOptions::default();

			let input = r#"
[youtube] Extracting URL: https://someurl.com/hello
[youtube] abc123DEF45: Downloading webpage
[info] abc123DEF45: Downloading 1 format(s): 616+140
[download] Destination: /tmp/dl/Some Title Here - abc123DEF45.f616.mp4
[download]   0.0% of 78.44MiB at 207.76KiB/s ETA 06:27
[download]  50.0% of 78.44MiB at 526.19KiB/s ETA 01:16
[download] 100% of 78.44MiB at  5.89MiB/s ETA 00:00
[download] 100% of 78.44MiB in 00:07
[download] Destination: /tmp/dl/Some Title Here - abc123DEF45.f140.m4a
[download]   0.0% of 3.47MiB at 196.76KiB/s ETA 00:18
[download]  57.6% of 3.47MiB at  9.57MiB/s ETA 00:00
[download] 100% of 3.47MiB at 10.57MiB/s ETA 00:00
[download] 100% of 3.47MiB in 00:00
[Merger] Merging formats into "/tmp/dl/Some Title Here - abc123DEF45.mkv"
Deleting original file /tmp/dl/Some Title Here - abc123DEF45.f616.mp4 (pass -k to keep)
Deleting original file /tmp/dl/Some Title Here - abc123DEF45.f140.m4a (pass -k to keep)
			"#;

			let mut media_vec: Vec<MediaInfo> = Vec::new();

			let res = handle_stdout(
				&options,
				callback_counter(&expect_index, expected_pg),
				BufReader::new(input.as_bytes()),
				&mut media_vec,
			);

			assert!(res.is_ok());

			assert_eq!(
				vec![
					MediaInfo::new("abc123DEF45")
						.with_title("Some Title Here")
						.with_filename("Some Title Here - abc123DEF45.mkv")
				],
				media_vec
			);
		}

		#[test]
		fn test_audio_extraction() {
			let expected_pg = &vec![
				DownloadProgress::UrlStarting,
				snapshot(0, "3.47MiB", Some("196.76KiB/s"), Some("00:18")),
				snapshot(100, "3.47MiB", Some("10.57MiB/s"), Some("00:00")),
				snapshot(100, "3.47MiB", None, None),
				DownloadProgress::PostProcessing,
				DownloadProgress::UrlFinished(1),
			];
			let expect_index = Arc::new(AtomicUsize::new(0));

			let options = TestOptions::default();

			let input = r#"
[soundcloud] Extracting URL: https://someurl.com/hello
[download] Destination: /tmp/dl/Some Song - 123456789.opus
[download]   0.0% of 3.47MiB at 196.76KiB/s ETA 00:18
[download] 100% of 3.47MiB at 10.57MiB/s ETA 00:00
[download] 100% of 3.47MiB in 00:00
[ExtractAudio] Destination: /tmp/dl/Some Song - 123456789.mp3
Deleting original file /tmp/dl/Some Song - 123456789.opus (pass -k to keep)
			"#;

			let mut media_vec: Vec<MediaInfo> = Vec::new();

			let res = handle_stdout(
				&options,
				callback_counter(&expect_index, expected_pg),
				BufReader::new(input.as_bytes()),
				&mut media_vec,
			);

			assert!(res.is_ok());

			// the ExtractAudio destination replaces the original filename
			assert_eq!(
				vec![
					MediaInfo::new("123456789")
						.with_title("Some Song")
						.with_filename("Some Song - 123456789.mp3")
				],
				media_vec
			);
		}

		#[test]
		fn test_trailing_error_fails() {
			let expected_pg = &vec![
				DownloadProgress::UrlStarting,
				snapshot(2, "5.00MiB", Some("4.18MiB/s"), Some("01:09")),
				DownloadProgress::UrlFinished(1),
			];
			let expect_index = Arc::new(AtomicUsize::new(0));

			let options = TestOptions::default();

			let input = r#"
[aprovider] Extracting URL: https://someurl.com/hello
[download] Destination: /tmp/dl/Some Title - someid1.mp4
[download]   2.7% of  5.00MiB at    4.18MiB/s ETA 01:09
ERROR: unable to write data: [Errno 28] No space left on device
			"#;

			let mut media_vec: Vec<MediaInfo> = Vec::new();

			let res = handle_stdout(
				&options,
				callback_counter(&expect_index, expected_pg),
				BufReader::new(input.as_bytes()),
				&mut media_vec,
			);

			assert_eq!(
				Err(crate::Error::other(
					"ERROR: unable to write data: [Errno 28] No space left on device"
				)),
				res
			);
		}

		#[test]
		fn test_error_cleared_by_later_lines() {
			let expected_pg = &vec![
				DownloadProgress::UrlStarting,
				snapshot(100, "3.47MiB", None, None),
				DownloadProgress::UrlFinished(1),
			];
			let expect_index = Arc::new(AtomicUsize::new(0));

			let options = TestOptions::default();

			// a single media erroring inside a playlist does not fail the whole url
			let input = r#"
[aprovider] Extracting URL: https://someurl.com/hello
ERROR: [aprovider] someid1: somekinda error
[download] Destination: /tmp/dl/Some Title - someid2.mp4
[download] 100% of 3.47MiB in 00:00
			"#;

			let mut media_vec: Vec<MediaInfo> = Vec::new();

			let res = handle_stdout(
				&options,
				callback_counter(&expect_index, expected_pg),
				BufReader::new(input.as_bytes()),
				&mut media_vec,
			);

			assert!(res.is_ok());

			assert_eq!(
				vec![
					MediaInfo::new("someid2")
						.with_title("Some Title")
						.with_filename("Some Title - someid2.mp4")
				],
				media_vec
			);
		}

		#[test]
		fn test_warning_line() {
			let expected_pg = &vec![
				DownloadProgress::UrlStarting,
				snapshot(100, "2.16MiB", None, None),
				DownloadProgress::UrlFinished(1),
			];
			let expect_index = Arc::new(AtomicUsize::new(0));

			let options = TestOptions::default();

			let input = r#"
[youtube] Extracting URL: https://someurl.com/hello
WARNING: [youtube] Falling back to generic n function search
[download] Destination: /tmp/dl/Some Title - abc123DEF45.webm
[download] 100% of 2.16MiB in 00:00
			"#;

			let mut media_vec: Vec<MediaInfo> = Vec::new();

			let res = handle_stdout(
				&options,
				callback_counter(&expect_index, expected_pg),
				BufReader::new(input.as_bytes()),
				&mut media_vec,
			);

			assert!(res.is_ok());

			assert_eq!(1, media_vec.len());
		}
	}

	mod record_destination {
		use super::*;

		#[test]
		fn test_format_suffix_stripped() {
			let mut media_vec: Vec<MediaInfo> = Vec::new();

			record_destination(&mut media_vec, Path::new("/tmp/dl/Some Title - someid.f616.mp4"));
			record_destination(&mut media_vec, Path::new("/tmp/dl/Some Title - someid.f140.m4a"));
			record_destination(&mut media_vec, Path::new("/tmp/dl/Some Title - someid.mkv"));

			assert_eq!(
				vec![
					MediaInfo::new("someid")
						.with_title("Some Title")
						.with_filename("Some Title - someid.mkv")
				],
				media_vec
			);
		}

		#[test]
		fn test_non_template_name_ignored() {
			let mut media_vec: Vec<MediaInfo> = Vec::new();

			record_destination(&mut media_vec, Path::new("/tmp/dl/impropername.something"));

			assert!(media_vec.is_empty());
		}
	}
}
