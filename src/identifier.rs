//! Identifier classification.
//!
//! Each subcommand takes one free-form argument. The classifier turns it into
//! the exact parameter the upstream API expects, or rejects it before any
//! network call is made.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use crate::error::IdentifierError;

// ============================================================================
// Subcommand
// ============================================================================

/// The closed set of supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    /// Edge/origin diagnostics for an Akamaized URL.
    UrlDebug,
    /// Translation of an Akamai error reference code.
    Reference,
    /// Origin hostnames configured for a property hostname.
    Origins,
}

impl Subcommand {
    /// All subcommands, in help order.
    pub const ALL: [Self; 3] = [Self::UrlDebug, Self::Reference, Self::Origins];

    /// Name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UrlDebug => "urldebug",
            Self::Reference => "reference",
            Self::Origins => "origins",
        }
    }
}

impl fmt::Display for Subcommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subcommand {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| IdentifierError::UnknownSubcommand { name: s.to_string() })
    }
}

// ============================================================================
// Classified Identifier
// ============================================================================

/// An identifier shaped for its upstream API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedIdentifier {
    /// Absolute `http`/`https` URL, kept exactly as the user typed it.
    Url(String),
    /// Decoded reference code.
    ReferenceCode(String),
    /// Property hostname.
    Hostname(String),
}

impl ClassifiedIdentifier {
    /// The subcommand this identifier was classified for.
    #[must_use]
    pub const fn subcommand(&self) -> Subcommand {
        match self {
            Self::Url(_) => Subcommand::UrlDebug,
            Self::ReferenceCode(_) => Subcommand::Reference,
            Self::Hostname(_) => Subcommand::Origins,
        }
    }

    /// The shaped value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::ReferenceCode(s) | Self::Hostname(s) => s,
        }
    }
}

// ============================================================================
// Classifiers
// ============================================================================

/// Classifies `input` for `subcommand`.
///
/// # Errors
///
/// Returns `IdentifierError::InvalidIdentifier` when the input cannot be
/// used for the subcommand.
pub fn classify(
    subcommand: Subcommand,
    input: &str,
) -> Result<ClassifiedIdentifier, IdentifierError> {
    match subcommand {
        Subcommand::UrlDebug => classify_url(input),
        Subcommand::Reference => classify_reference(input),
        Subcommand::Origins => classify_hostname(input),
    }
}

/// Requires a fully-qualified `http`/`https` URL with a host.
///
/// # Errors
///
/// Returns `IdentifierError::InvalidIdentifier` if the URL cannot be parsed,
/// has another scheme, or has no host.
pub fn classify_url(input: &str) -> Result<ClassifiedIdentifier, IdentifierError> {
    let trimmed = input.trim();
    let invalid = |reason: String| IdentifierError::InvalidIdentifier {
        input: input.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(format!("URL could not be parsed ({e})")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "URL scheme must be http or https, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }

    Ok(ClassifiedIdentifier::Url(trimmed.to_string()))
}

/// Decodes HTML entities and strips any `Reference #` prefix.
///
/// Error pages print codes like `Reference&#32;&#35;18.6f64d440.1632407113.2b5c1a`;
/// both that form and the bare code are accepted.
///
/// # Errors
///
/// Returns `IdentifierError::InvalidIdentifier` if nothing is left after
/// decoding.
pub fn classify_reference(input: &str) -> Result<ClassifiedIdentifier, IdentifierError> {
    let decoded = html_escape::decode_html_entities(input.trim());
    let code = match decoded.split_once('#') {
        Some((_, rest)) => rest.split('#').next().unwrap_or_default(),
        None => decoded.as_ref(),
    }
    .trim();

    if code.is_empty() {
        return Err(IdentifierError::InvalidIdentifier {
            input: input.to_string(),
            reason: "reference code is empty".to_string(),
        });
    }

    Ok(ClassifiedIdentifier::ReferenceCode(code.to_string()))
}

/// Passes the hostname through with surrounding whitespace removed.
///
/// # Errors
///
/// Returns `IdentifierError::InvalidIdentifier` for a blank hostname.
pub fn classify_hostname(input: &str) -> Result<ClassifiedIdentifier, IdentifierError> {
    let hostname = input.trim();
    if hostname.is_empty() {
        return Err(IdentifierError::InvalidIdentifier {
            input: input.to_string(),
            reason: "hostname is empty".to_string(),
        });
    }
    Ok(ClassifiedIdentifier::Hostname(hostname.to_string()))
}
