//! Module for Clap related structs (derived)

#![deny(missing_docs)] // comments are used for "--help" generation, so it should always be defined

use clap::{
	ArgAction,
	Args,
	Parser,
	Subcommand,
};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Trait to check and transform all Command Structures
trait Check {
	/// Check and transform self to be correct
	fn check(&mut self) -> Result<(), crate::Error>;
}

#[derive(Debug, Parser, Clone, PartialEq)]
#[command(author, version = env!("YTFETCH_VERSION"), about, long_about = None)]
#[command(bin_name("ytfetch"))]
#[command(disable_help_subcommand(true))] // Disable subcommand "help", only "-h --help" should be used
pub struct CliDerive {
	/// Set Logging verbosity (0 - Default - WARN, 1 - INFO, 2 - DEBUG, 3 - TRACE)
	#[arg(short, long, action = ArgAction::Count, env = "YTFETCH_VERBOSITY")]
	pub verbosity:    u8,
	/// Temporary directory path to store downloads in before they are moved to the output directory
	#[arg(long = "tmp", env = "YTFETCH_TMP")]
	pub tmp_path:     Option<PathBuf>,
	/// Write logs to the given file, in addition to the terminal
	#[arg(long = "logfile", env = "YTFETCH_LOGFILE")]
	pub log_file:     Option<PathBuf>,
	/// Explicitly set interactive / not interactive
	#[arg(long = "interactive")]
	pub explicit_tty: Option<bool>,
	/// Force Color to be active in any mode
	#[arg(long = "color")]
	pub force_color:  bool,

	/// Subcommand to run
	#[command(subcommand)]
	pub subcommands: SubCommands,
}

impl CliDerive {
	/// Execute clap::Parser::parse and apply custom validation and transformation logic
	#[must_use]
	pub fn custom_parse() -> Self {
		let mut parsed = Self::parse();

		Check::check(&mut parsed).expect("Expected the check to not fail");

		return parsed;
	}

	/// Get if the mode is interactive or not
	#[must_use]
	pub fn is_interactive(&self) -> bool {
		if let Some(explicit_tty) = self.explicit_tty {
			return explicit_tty;
		}

		return std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
	}

	/// Get if the colors are enabled or not
	#[must_use]
	pub fn enable_colors(&self) -> bool {
		return self.force_color | self.is_interactive();
	}
}

impl Check for CliDerive {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Check::check(&mut self.subcommands);
	}
}

/// All subcommands of the binary
#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum SubCommands {
	/// Download URLs as video files (with audio)
	Video(CommandVideo),
	/// Download URLs as audio-only files
	Audio(CommandAudio),
	/// Generate shell completions
	Completions(CommandCompletions),
}

impl Check for SubCommands {
	fn check(&mut self) -> Result<(), crate::Error> {
		match self {
			SubCommands::Video(v) => return Check::check(v),
			SubCommands::Audio(v) => return Check::check(v),
			SubCommands::Completions(v) => return Check::check(v),
		}
	}
}

/// Arguments shared between the "video" and "audio" subcommands
#[derive(Debug, Args, Clone, PartialEq)]
pub struct CommonDownloadArgs {
	/// Output directory for completed downloads
	#[arg(short, long = "out", env = "YTFETCH_OUT")]
	pub output_path:         Option<PathBuf>,
	/// Do not download / embed subtitles (video) or lyrics (audio)
	#[arg(long = "no-subs")]
	pub no_subs:             bool,
	/// Let youtube-dl simulate the downloads, without writing any media files
	#[arg(short = 's', long)]
	pub simulate:            bool,
	/// Allow youtube-dl to overwrite files that already exist in the temporary directory
	#[arg(long)]
	pub overwrite:           bool,
	/// Explicit youtube-dl format selection, overriding the subcommand default
	#[arg(short = 'f', long = "format", env = "YTFETCH_FORMAT")]
	pub format_override:     Option<String>,
	/// Cookie file to pass to youtube-dl
	#[arg(long, env = "YTFETCH_COOKIES")]
	pub cookies:             Option<PathBuf>,
	/// Path of the ffmpeg executable youtube-dl should use
	#[arg(long = "ffmpeg-location", env = "YTFETCH_FFMPEG")]
	pub ffmpeg_location:     Option<PathBuf>,
	/// Print youtube-dl output lines
	/// This will still require logging verbosity set to 3 or "RUST_LOG=trace"
	#[arg(long = "youtubedl-stdout")]
	pub print_youtubedl_log: bool,
	/// Extra argument passed through to youtube-dl, can be specified multiple times
	#[arg(long = "ytdl-arg")]
	pub extra_ytdl_args:     Vec<String>,

	/// URLs to download, or paths of files containing one URL per line
	pub urls: Vec<String>,
}

impl Check for CommonDownloadArgs {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Ok(());
	}
}

/// Run and download the given URL(s) as video files
#[derive(Debug, Args, Clone, PartialEq)]
pub struct CommandVideo {
	/// Do not download / merge any audio streams
	#[arg(long = "no-audio")]
	pub no_audio: bool,

	/// Shared download arguments
	#[command(flatten)]
	pub common: CommonDownloadArgs,
}

impl Check for CommandVideo {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Check::check(&mut self.common);
	}
}

/// Run and download the given URL(s) as audio-only files
#[derive(Debug, Args, Clone, PartialEq)]
pub struct CommandAudio {
	/// Shared download arguments
	#[command(flatten)]
	pub common: CommonDownloadArgs,
}

impl Check for CommandAudio {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Check::check(&mut self.common);
	}
}

/// Generate shell completions for the binary
#[derive(Debug, Args, Clone, PartialEq)]
pub struct CommandCompletions {
	/// The shell to generate completions for
	#[arg(value_enum)]
	pub shell: clap_complete::Shell,
	/// Output file path for the completions (stdout when not given)
	#[arg(short, long = "out")]
	pub output_file_path: Option<PathBuf>,
}

impl Check for CommandCompletions {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Ok(());
	}
}
