//! Module that contains all logic for spawning the "ffmpeg" command
use std::{
	path::Path,
	process::{
		Command,
		Output,
		Stdio,
	},
	sync::LazyLock,
};

use regex::Regex;

use crate::error::IOErrorToError;

/// Binary name to spawn for the ffmpeg process, when no explicit location is given
pub const FFMPEG_BIN_NAME: &str = "ffmpeg";

/// Create a new ffmpeg [Command] instance, using `location` over [FFMPEG_BIN_NAME] when given
#[inline]
#[must_use]
pub fn base_ffmpeg(location: Option<&Path>) -> Command {
	return match location {
		Some(v) => Command::new(v),
		None => Command::new(FFMPEG_BIN_NAME),
	};
}

/// Test if ffmpeg is installed and reachable and return the version found.
///
/// This function is not automatically called in the library, it is recommended to run this in any binary trying to run libytfetch.
pub fn require_ffmpeg_installed(location: Option<&Path>) -> Result<String, crate::Error> {
	return match ffmpeg_version(location) {
		Ok(v) => Ok(v),
		Err(err) => {
			log::error!("Could not start or find ffmpeg! Error: {}", err);

			return Err(crate::Error::custom_ioerror_location(
				std::io::ErrorKind::NotFound,
				"FFmpeg Version could not be determined, is it installed and reachable?",
				format!("{} in PATH", FFMPEG_BIN_NAME),
			));
		},
	};
}

/// Regex to parse the version from a "ffmpeg -version" output
/// cap1: version
static FFMPEG_VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	return Regex::new(r"(?mi)^ffmpeg version ([a-z0-9.-]+) Copyright").unwrap();
});

/// Get Version of `ffmpeg`
#[inline]
pub fn ffmpeg_version(location: Option<&Path>) -> Result<String, crate::Error> {
	let mut cmd = base_ffmpeg(location);
	cmd.arg("-version");

	let command_output: Output = cmd
		.stderr(Stdio::null())
		.stdout(Stdio::piped())
		.stdin(Stdio::null())
		.spawn()
		.attach_location_err("ffmpeg spawn")?
		.wait_with_output()
		.attach_location_err("ffmpeg wait_with_output")?;

	if !command_output.status.success() {
		return Err(crate::Error::command_unsuccessful("FFMPEG did not successfully exit!"));
	}

	let as_string = String::from_utf8(command_output.stdout)?;

	return ffmpeg_parse_version(&as_string);
}

/// Internal Function to parse the input to a ffmpeg version with regex
#[inline]
fn ffmpeg_parse_version(input: &str) -> Result<String, crate::Error> {
	return Ok(FFMPEG_VERSION_REGEX
		.captures_iter(input)
		.next()
		.ok_or_else(|| return crate::Error::no_captures("FFMPEG Version could not be determined"))?[1]
		.to_owned());
}

#[cfg(test)]
mod test {
	use super::ffmpeg_version;

	#[test]
	fn test_ffmpeg_parse_version_invalid_input() {
		assert_eq!(
			super::ffmpeg_parse_version("hello"),
			Err(crate::Error::no_captures("FFMPEG Version could not be determined"))
		);
	}

	#[test]
	fn test_ffmpeg_parse_version_valid_static_input() {
		let ffmpeg_output = "ffmpeg version n6.1.1 Copyright (c) 2000-2023 the FFmpeg developers
built with gcc 13.2.1 (GCC)
configuration: --prefix=/usr --disable-debug --disable-static --enable-gpl --enable-shared --enable-version3
libavutil      58. 29.100 / 58. 29.100
libavcodec     60. 31.102 / 60. 31.102
libavformat    60. 16.100 / 60. 16.100
";

		assert_eq!(super::ffmpeg_parse_version(ffmpeg_output), Ok("n6.1.1".to_owned()));
	}

	#[test]
	#[ignore = "CI Install not present currently"]
	fn test_ffmpeg_spawn() {
		assert!(ffmpeg_version(None).is_ok());
	}
}
