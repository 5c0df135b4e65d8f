//! Module for inspecting a URL before downloading anything from it

use std::{
	path::Path,
	process::{
		Output,
		Stdio,
	},
};

use crate::{
	data::url_info::UrlInfo,
	error::IOErrorToError,
	spawn::ytdl::base_ytdl,
};

/// Inspect the given `url` without downloading any media
/// Spawns youtube-dl with a JSON dump argument and parses the result into a [`UrlInfo`]
pub fn inspect_url(url: &str, cookies: Option<&Path>) -> Result<UrlInfo, crate::Error> {
	let mut cmd = base_ytdl();
	// dump one JSON document for the whole url, without downloading any media
	cmd.arg("--dump-single-json");
	// only resolve minimal information for playlist entries, instead of every single media
	cmd.arg("--flat-playlist");
	// keep warnings out of the dump
	cmd.arg("--no-warnings");

	if let Some(cookies) = cookies {
		cmd.arg("--cookies").arg(cookies);
	}

	cmd.arg(url);

	info!("Inspecting URL \"{}\"", url);

	let command_output: Output = cmd
		.stderr(Stdio::piped())
		.stdout(Stdio::piped())
		.stdin(Stdio::null())
		.spawn()
		.attach_location_err("ytdl inspect spawn")?
		.wait_with_output()
		.attach_location_err("ytdl inspect wait_with_output")?;

	if !command_output.status.success() {
		let stderr = String::from_utf8_lossy(&command_output.stderr);
		let last_lines = stderr.lines().rev().take(5).collect::<Vec<&str>>().join("\n");

		return Err(crate::Error::command_unsuccessful(format!(
			"YTDL inspection command failed, code: {}, last lines:\n{}",
			command_output
				.status
				.code()
				.map_or("None".into(), |v| return v.to_string()),
			last_lines
		)));
	}

	let as_string = String::from_utf8(command_output.stdout)?;

	return parse_url_info(&as_string);
}

/// Internal Function to parse a JSON dump into a [`UrlInfo`]
#[inline]
fn parse_url_info(input: &str) -> Result<UrlInfo, crate::Error> {
	let info: UrlInfo = serde_json::from_str(input.trim())?;

	return Ok(info);
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_parse_url_info_valid() {
		let input = r#"
		{"id": "abc123DEF45", "title": "Some Title", "extractor": "youtube", "webpage_url": "https://someurl.com/hello"}
		"#;

		let parsed = parse_url_info(input).expect("Expected the input to parse");

		assert_eq!("abc123DEF45", parsed.id);
		assert_eq!("Some Title", parsed.display_title());
	}

	#[test]
	fn test_parse_url_info_invalid() {
		let input = "this is not json";

		assert!(parse_url_info(input).is_err());
	}

	#[test]
	#[ignore = "CI Install not present currently"]
	fn test_inspect_spawn() {
		assert!(inspect_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ", None).is_ok());
	}
}
