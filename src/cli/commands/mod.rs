//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod lookup;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::AkamaiGetError;
use crate::identifier::Subcommand;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), AkamaiGetError> {
    match &cli.command {
        Commands::UrlDebug(args) => lookup::run(&cli, Subcommand::UrlDebug, &args.url).await,
        Commands::Reference(args) => {
            lookup::run(&cli, Subcommand::Reference, &args.reference).await
        }
        Commands::Origins(args) => lookup::run(&cli, Subcommand::Origins, &args.hostname).await,
        Commands::Completions(args) => {
            completions::run(args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(args);
            Ok(())
        }
    }
}
