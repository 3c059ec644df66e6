//! Subcommand routing.
//!
//! Each subcommand maps to exactly one classifier, endpoint and normalizer.
//! The pipeline is: route, classify, invoke, normalize, render. Nothing is
//! retried or recovered here; every error propagates to the caller.

use serde_json::Value;
use tracing::{debug, info};

use crate::client::{Endpoint, Invoker};
use crate::error::{IdentifierError, Result};
use crate::identifier::{self, ClassifiedIdentifier, Subcommand};
use crate::normalize::{Normalizer, Record, origins, reference, urldebug};
use crate::render::{DisplayMode, render};

/// Shapes a raw identifier for its API.
pub type Classifier = fn(&str) -> std::result::Result<ClassifiedIdentifier, IdentifierError>;

/// The fixed handling of one subcommand.
#[derive(Clone, Copy)]
pub struct Route {
    /// Subcommand this route serves.
    pub subcommand: Subcommand,
    /// Identifier classifier.
    pub classify: Classifier,
    /// Upstream endpoint.
    pub endpoint: Endpoint,
    /// Response normalizer.
    pub normalize: Normalizer,
}

/// Returns the route for `subcommand`.
#[must_use]
pub fn route(subcommand: Subcommand) -> Route {
    match subcommand {
        Subcommand::UrlDebug => Route {
            subcommand,
            classify: identifier::classify_url,
            endpoint: Endpoint::UrlDebug,
            normalize: urldebug::normalize,
        },
        Subcommand::Reference => Route {
            subcommand,
            classify: identifier::classify_reference,
            endpoint: Endpoint::TranslatedError,
            normalize: reference::normalize,
        },
        Subcommand::Origins => Route {
            subcommand,
            classify: identifier::classify_hostname,
            endpoint: Endpoint::PropertyRules,
            normalize: origins::normalize,
        },
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Upstream payload, unmodified.
    pub raw: Value,
    /// Normalized record.
    pub record: Record,
    /// Text for stdout.
    pub rendered: String,
}

/// Routes `name`, then classifies, invokes, normalizes and renders.
///
/// # Errors
///
/// Returns `IdentifierError::UnknownSubcommand` for an unsupported `name`
/// before anything else happens, and otherwise the first error of the
/// classify/invoke/normalize chain.
pub async fn dispatch(
    name: &str,
    input: &str,
    mode: DisplayMode,
    invoker: &dyn Invoker,
) -> Result<Outcome> {
    let subcommand: Subcommand = name.parse()?;
    run(route(subcommand), input, mode, invoker).await
}

/// Runs the pipeline for an already-selected route.
///
/// # Errors
///
/// Returns the first error of the classify/invoke/normalize chain.
pub async fn run(
    route: Route,
    input: &str,
    mode: DisplayMode,
    invoker: &dyn Invoker,
) -> Result<Outcome> {
    let id = (route.classify)(input)?;
    debug!(subcommand = %route.subcommand, identifier = id.as_str(), "classified identifier");

    let raw = invoker.invoke(route.endpoint, &id).await?;
    let record = (route.normalize)(&raw)?;
    info!(
        subcommand = %route.subcommand,
        fields = record.fields.len(),
        "normalized response"
    );

    let rendered = render(&record, &raw, mode)?;
    Ok(Outcome {
        raw,
        record,
        rendered,
    })
}
