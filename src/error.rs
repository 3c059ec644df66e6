//! Error types for `akamai-get`
//!
//! Every failure of a run surfaces here and maps to a fixed process exit
//! code. Nothing in the pipeline recovers locally: classification, transport,
//! upstream and normalization errors all propagate to `main`.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `akamai-get` runs.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Usage error (unknown subcommand, identifier rejected by the classifier)
    pub const USAGE_ERROR: i32 = 2;

    /// Transport error (connection failed, timeout)
    pub const TRANSPORT_ERROR: i32 = 3;

    /// Upstream body was not JSON or not an object at its root
    pub const MALFORMED_RESPONSE: i32 = 4;

    /// Upstream answered with a non-success status or had nothing to return
    pub const UPSTREAM_ERROR: i32 = 5;

    /// Credential file missing or incomplete
    pub const CONFIG_ERROR: i32 = 6;

    /// Local I/O error (writing the `--json` export)
    pub const IO_ERROR: i32 = 7;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `akamai-get` operations.
#[derive(Debug, Error)]
pub enum AkamaiGetError {
    /// Subcommand or identifier rejected before any network call
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// API call failed
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// Upstream payload could not be normalized
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Credential loading failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AkamaiGetError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Identifier(_) => ExitCode::USAGE_ERROR,
            Self::Invoke(err) => err.exit_code(),
            Self::Normalize(_) => ExitCode::MALFORMED_RESPONSE,
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Identifier Errors
// ============================================================================

/// Errors raised while routing a subcommand or shaping its identifier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// Subcommand name is not one of the supported operations
    #[error("unknown subcommand '{name}' (expected one of: urldebug, reference, origins)")]
    UnknownSubcommand {
        /// The name that was given
        name: String,
    },

    /// Identifier cannot be used for the selected subcommand
    #[error("invalid identifier '{input}': {reason}")]
    InvalidIdentifier {
        /// The raw identifier
        input: String,
        /// Why it was rejected
        reason: String,
    },
}

// ============================================================================
// Invoke Errors
// ============================================================================

/// Errors from the API invoker.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// Connection, TLS or protocol failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The exchange did not complete within the configured bound
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Upstream returned a non-success status
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body, truncated for display
        body: String,
    },

    /// Upstream body is not JSON
    #[error(transparent)]
    Malformed(#[from] NormalizeError),

    /// Upstream had nothing for this identifier
    #[error("not found: {0}")]
    NotFound(String),
}

impl InvokeError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Transport(_) | Self::Timeout(_) => ExitCode::TRANSPORT_ERROR,
            Self::Upstream { .. } | Self::NotFound(_) => ExitCode::UPSTREAM_ERROR,
            Self::Malformed(_) => ExitCode::MALFORMED_RESPONSE,
        }
    }

    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Upstream { status, .. } => matches!(*status, 429 | 500 | 502 | 503 | 504),
            Self::Malformed(_) | Self::NotFound(_) => false,
        }
    }
}

// ============================================================================
// Normalize Errors
// ============================================================================

/// Structural failures of an upstream payload.
///
/// Missing or mistyped fields are never errors; they resolve to a placeholder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Body could not be parsed as JSON
    #[error("malformed response: not valid JSON ({0})")]
    NotJson(String),

    /// Body parsed but its root is not an object
    #[error("malformed response: expected a JSON object at the root, got {0}")]
    NotAnObject(&'static str),

    /// An intermediate lookup response lacks the members it is used for
    #[error("malformed response: {0}")]
    UnexpectedShape(String),
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors loading EdgeGrid credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Credential file does not exist
    #[error("credential file not found: {path}")]
    MissingFile {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Credential file could not be parsed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the credential file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Requested section is absent
    #[error("section [{section}] not found in {path}")]
    MissingSection {
        /// Section name
        section: String,
        /// Path to the credential file
        path: PathBuf,
    },

    /// Required key is absent from the section
    #[error("missing required key '{key}' in section [{section}]")]
    MissingKey {
        /// Key name
        key: &'static str,
        /// Section name
        section: String,
    },

    /// Key is present but unusable
    #[error("invalid value for '{key}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Key name
        key: &'static str,
        /// Value found
        value: String,
        /// Description of what was expected
        expected: &'static str,
    },

    /// No home directory to expand `~` against
    #[error("cannot expand '~': home directory is unknown")]
    NoHomeDir,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `akamai-get` operations.
pub type Result<T> = std::result::Result<T, AkamaiGetError>;

// ============================================================================
// Tests
// ============================================================================
