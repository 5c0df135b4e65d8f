#![allow(clippy::needless_return)]
#![warn(clippy::implicit_return)]

#[macro_use]
extern crate log;

use flexi_logger::LogSpecification;
use libytfetch::{
	error::IOErrorToError,
	options::MediaKind,
};
use std::sync::atomic::{
	AtomicBool,
	Ordering,
};

mod clap_conf;
use clap_conf::{
	CliDerive,
	SubCommands,
};

mod commands;
mod logger;
mod state;
mod utils;

pub use libytfetch::error::Error;

/// Global flag for a requested termination (like Ctrl-C), checked between URLs
static TERMINATE: AtomicBool = AtomicBool::new(false);

/// Helper to quickly check for termination
pub fn check_termination() -> Result<(), crate::Error> {
	if TERMINATE.load(Ordering::Relaxed) {
		return Err(crate::Error::other("Termination Requested"));
	}

	return Ok(());
}

/// Main
fn main() -> Result<(), crate::Error> {
	let cli_matches = CliDerive::custom_parse();

	let mut logger_handle = logger::setup_logger(cli_matches.log_file.as_deref()).attach_location_err("logger setup")?;

	log::info!("CLI Verbosity is {}", cli_matches.verbosity);

	// apply cli "verbosity" argument to the log level
	logger_handle.set_new_spec(
		match cli_matches.verbosity {
			0 => LogSpecification::parse("warn"),
			1 => LogSpecification::parse("info"),
			2 => LogSpecification::parse("debug"),
			3 => LogSpecification::parse("trace"),
			_ => {
				return Err(crate::Error::other(
					"Expected verbosity integer range between 0 and 3 (inclusive)",
				));
			},
		}
		.expect("Expected LogSpecification to parse correctly"),
	);

	// only disable colors when not enabled, so that "colored" can keep its automatic detection otherwise
	if !cli_matches.enable_colors() {
		colored::control::set_override(false);
	} else if cli_matches.force_color {
		colored::control::set_override(true);
	}

	info!("ytfetch {} started (pid {})", env!("YTFETCH_VERSION"), std::process::id());

	ctrlc::set_handler(|| {
		// a repeated signal forces a direct exit
		if TERMINATE.swap(true, Ordering::SeqCst) {
			std::process::exit(1);
		}

		eprintln!("Termination requested, finishing the current step (repeat to force-quit)");
	})
	.map_err(|err| return crate::Error::other(format!("Failed to set the Ctrl-C handler: {err}")))?;

	match &cli_matches.subcommands {
		SubCommands::Video(v) => {
			return commands::download::command_download(
				&cli_matches,
				MediaKind::Video {
					include_audio: !v.no_audio,
				},
				&v.common,
			);
		},
		SubCommands::Audio(v) => {
			return commands::download::command_download(&cli_matches, MediaKind::Audio, &v.common);
		},
		SubCommands::Completions(v) => return commands::command_completions(&cli_matches, v),
	}
}
