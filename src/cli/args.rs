//! CLI argument definitions
//!
//! All Clap derive structs for `akamai-get` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_EDGERC, DEFAULT_SECTION};
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Get Akamai stuff: URL diagnostics, error reference translation and
/// property origins.
#[derive(Parser, Debug)]
#[command(name = "akamai-get", author, version, about)]
#[command(propagate_version = true)]
#[command(after_help = "Full upstream responses can be reviewed with --json export.json")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Credential and transport options.
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the complete upstream response as JSON and also save it to this file.
    #[arg(long, value_name = "PATH", global = true)]
    pub json: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Write debug logs to this file instead of stderr.
    #[arg(long, value_name = "FILE", global = true)]
    pub debug: Option<PathBuf>,

    /// Log record format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormat,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "AKAMAI_GET_COLOR")]
    pub color: ColorChoice,
}

/// Options for reaching the Akamai APIs.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to the EdgeGrid credential file.
    #[arg(long, default_value = DEFAULT_EDGERC, global = true, env = "AKAMAI_EDGERC")]
    pub edgerc: PathBuf,

    /// Section of the credential file to use.
    #[arg(long, default_value = DEFAULT_SECTION, global = true, env = "AKAMAI_EDGERC_SECTION")]
    pub section: String,

    /// Account switch key, for credentials that manage multiple accounts.
    #[arg(long, global = true, env = "AKAMAI_ACCOUNT_KEY")]
    pub account: Option<String>,

    /// Bound on each HTTP exchange (e.g. `30s`, `2m`).
    #[arg(
        long,
        default_value = "30s",
        value_parser = humantime::parse_duration,
        global = true,
        env = "AKAMAI_GET_TIMEOUT"
    )]
    pub timeout: Duration,

    /// Retries after a transport failure or a 429/5xx answer.
    #[arg(long, default_value_t = 0, global = true, env = "AKAMAI_GET_RETRIES")]
    pub retries: u32,

    /// Override the API base URL derived from the credential host.
    #[arg(long, hide = true, global = true, env = "AKAMAI_GET_BASE_URL")]
    pub base_url: Option<String>,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provide an Akamaized URL and receive status code, CP code and origin information.
    #[command(name = "urldebug")]
    UrlDebug(UrlDebugArgs),

    /// Translate an Akamai error reference or error string.
    Reference(ReferenceArgs),

    /// List the origins used by the property serving a hostname.
    Origins(OriginsArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `urldebug`.
#[derive(Args, Debug)]
pub struct UrlDebugArgs {
    /// URL to test, including scheme.
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Arguments for `reference`.
#[derive(Args, Debug)]
pub struct ReferenceArgs {
    /// Akamai error reference (HTML entities are decoded).
    #[arg(value_name = "REFERENCE")]
    pub reference: String,
}

/// Arguments for `origins`.
#[derive(Args, Debug)]
pub struct OriginsArgs {
    /// Akamaized hostname.
    #[arg(value_name = "HOSTNAME")]
    pub hostname: String,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urldebug_parses() {
        let cli = Cli::try_parse_from(["akamai-get", "urldebug", "https://www.example.com/"])
            .unwrap();
        match cli.command {
            Commands::UrlDebug(args) => assert_eq!(args.url, "https://www.example.com/"),
            other => panic!("Expected urldebug, got {other:?}"),
        }
    }

    #[test]
    fn test_json_flag_after_identifier() {
        let cli = Cli::try_parse_from([
            "akamai-get",
            "reference",
            "18.abc",
            "--json",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.json, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "akamai-get",
            "--section",
            "papi",
            "--account",
            "1-ABCDE",
            "origins",
            "www.example.com",
        ])
        .unwrap();
        assert_eq!(cli.connection.section, "papi");
        assert_eq!(cli.connection.account.as_deref(), Some("1-ABCDE"));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["akamai-get", "origins", "www.example.com"]).unwrap();
        assert_eq!(cli.connection.edgerc, PathBuf::from("~/.edgerc"));
        assert_eq!(cli.connection.section, "default");
        assert_eq!(cli.connection.timeout, Duration::from_secs(30));
        assert_eq!(cli.connection.retries, 0);
        assert!(cli.json.is_none());
    }

    #[test]
    fn test_timeout_humantime() {
        let cli = Cli::try_parse_from([
            "akamai-get",
            "--timeout",
            "1m 30s",
            "origins",
            "www.example.com",
        ])
        .unwrap();
        assert_eq!(cli.connection.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let result = Cli::try_parse_from([
            "akamai-get",
            "--timeout",
            "soon",
            "origins",
            "www.example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        let result = Cli::try_parse_from(["akamai-get", "foo", "bar"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::InvalidSubcommand
        );
    }

    #[test]
    fn test_identifier_required() {
        let result = Cli::try_parse_from(["akamai-get", "urldebug"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_debug() {
        let result = Cli::try_parse_from([
            "akamai-get",
            "--quiet",
            "--debug",
            "log.txt",
            "origins",
            "h",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_output() {
        let err = Cli::try_parse_from(["akamai-get", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["akamai-get", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["akamai-get", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["akamai-get", "-vvv", "origins", "h"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
