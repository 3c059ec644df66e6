//! `urldebug`, `reference` and `origins` handlers.
//!
//! All three share one flow: validate the identifier, load credentials,
//! run the pipeline, print, and optionally export the raw response.

use std::io::Write as _;

use tracing::debug;

use crate::cli::args::{Cli, ConnectionArgs};
use crate::client::AkamaiClient;
use crate::config::{ClientSettings, Credentials};
use crate::dispatch::{self, route};
use crate::error::AkamaiGetError;
use crate::identifier::Subcommand;
use crate::render::{DisplayMode, export_json};

/// Runs one lookup and writes the result to stdout.
///
/// # Errors
///
/// Returns an error if the identifier is rejected, credentials cannot be
/// loaded, the API call fails, the response is malformed, or the export
/// file cannot be written.
pub async fn run(cli: &Cli, subcommand: Subcommand, identifier: &str) -> Result<(), AkamaiGetError> {
    let route = route(subcommand);

    // Bad input is reported before credentials are touched.
    (route.classify)(identifier)?;

    let creds = Credentials::load(&cli.connection.edgerc, &cli.connection.section)?;
    let client = AkamaiClient::new(creds, client_settings(&cli.connection))?;

    let mode = if cli.json.is_some() {
        DisplayMode::FullJson
    } else {
        DisplayMode::Abbreviated
    };
    debug!(%subcommand, ?mode, "running lookup");

    let outcome = dispatch::run(route, identifier, mode, &client).await?;

    if let Some(path) = &cli.json {
        export_json(&outcome.raw, path)?;
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(outcome.rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Transport settings from the connection flags.
#[must_use]
pub fn client_settings(args: &ConnectionArgs) -> ClientSettings {
    ClientSettings {
        timeout: args.timeout,
        retries: args.retries,
        account_switch_key: args.account.clone().filter(|k| !k.trim().is_empty()),
        base_url: args.base_url.clone(),
        ..ClientSettings::default()
    }
}
