//! `akamai-get` - query Akamai diagnostic and property APIs

use clap::Parser;

use akamai_get::cli::args::Cli;
use akamai_get::cli::commands;
use akamai_get::error::ExitCode;
use akamai_get::observability::{LogTarget, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        let target = cli
            .debug
            .as_deref()
            .map_or(LogTarget::Stderr, LogTarget::File);
        if let Err(e) = init_logging(cli.log_format, cli.verbose, cli.color, target) {
            eprintln!("error: cannot open log file: {e}");
            std::process::exit(ExitCode::IO_ERROR);
        }
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
