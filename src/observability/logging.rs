//! Logging initialization for `akamai-get`.
//!
//! Provides structured logging via `tracing` with human-readable and
//! JSON output formats, configurable verbosity, and environment-based
//! override via `AKAMAI_GET_LOG_LEVEL`. Logs go to stderr, or to a file
//! when `--debug <file>` is given; stdout is reserved for rendered output.

use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable overriding the verbosity flags.
pub const LOG_LEVEL_ENV: &str = "AKAMAI_GET_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Where log records are written.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error.
    Stderr,
    /// A file, created or truncated; records are logged at debug level.
    File(&'a Path),
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initializes the global tracing subscriber.
///
/// If `AKAMAI_GET_LOG_LEVEL` is set it takes precedence over `verbosity`.
/// A file target raises the default level to at least debug.
///
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
///
/// # Errors
///
/// Returns an I/O error if the log file cannot be created.
pub fn init_logging(
    format: LogFormat,
    verbosity: u8,
    color: ColorChoice,
    target: LogTarget<'_>,
) -> std::io::Result<()> {
    let verbosity = match target {
        LogTarget::Stderr => verbosity,
        LogTarget::File(_) => verbosity.max(2),
    };
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let show_target = verbosity >= 2;

    match target {
        LogTarget::Stderr => {
            let use_ansi = match color {
                ColorChoice::Auto => {
                    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
                }
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            };
            match format {
                LogFormat::Human => {
                    let _ = tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_ansi(use_ansi)
                        .with_target(show_target)
                        .with_writer(std::io::stderr)
                        .try_init();
                }
                LogFormat::Json => {
                    let _ = tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .json()
                        .with_target(show_target)
                        .with_writer(std::io::stderr)
                        .try_init();
                }
            }
        }
        LogTarget::File(path) => {
            let writer = Mutex::new(File::create(path)?);
            match format {
                LogFormat::Human => {
                    let _ = tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_ansi(false)
                        .with_target(show_target)
                        .with_writer(writer)
                        .try_init();
                }
                LogFormat::Json => {
                    let _ = tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .json()
                        .with_target(show_target)
                        .with_writer(writer)
                        .try_init();
                }
            }
        }
    }
    Ok(())
}
