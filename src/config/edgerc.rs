//! EdgeGrid credential file loading.
//!
//! `.edgerc` is an INI file with one section per API client:
//!
//! ```ini
//! [default]
//! host = akab-xxxx.luna.akamaiapis.net
//! client_token = akab-...
//! client_secret = ...
//! access_token = akab-...
//! max_body = 131072
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::error::ConfigError;

/// Default credential file location.
pub const DEFAULT_EDGERC: &str = "~/.edgerc";

/// Default section name.
pub const DEFAULT_SECTION: &str = "default";

/// Default cap on the number of POST body bytes included in the signature.
pub const DEFAULT_MAX_BODY: usize = 131_072;

/// One API client's credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API host, without scheme.
    pub host: String,
    /// Client token.
    pub client_token: String,
    /// Client secret (signing key material).
    pub client_secret: String,
    /// Access token.
    pub access_token: String,
    /// Maximum body bytes hashed for signing.
    pub max_body: usize,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("client_token", &self.client_token)
            .field("client_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl Credentials {
    /// Loads a section from the credential file at `path`.
    ///
    /// A leading `~` in `path` is expanded to the home directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or unparsable, or the
    /// section or a required key is absent.
    pub fn load(path: &Path, section: &str) -> Result<Self, ConfigError> {
        let path = expand_tilde(path)?;
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::MissingFile { path: path.clone() }
            } else {
                ConfigError::ParseError {
                    path: path.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!(path = %path.display(), section, "loading credentials");
        Self::from_ini_str(&contents, &path, section)
    }

    /// Parses a section out of INI text; `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is unparsable, or the section or a
    /// required key is absent.
    pub fn from_ini_str(contents: &str, path: &Path, section: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let props = ini
            .section(Some(section))
            .ok_or_else(|| ConfigError::MissingSection {
                section: section.to_string(),
                path: path.to_path_buf(),
            })?;

        let required = |key: &'static str| {
            props
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ConfigError::MissingKey {
                    key,
                    section: section.to_string(),
                })
        };

        let max_body = match props.get("max_body").map(str::trim) {
            None | Some("") => DEFAULT_MAX_BODY,
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "max_body",
                value: raw.to_string(),
                expected: "a non-negative integer",
            })?,
        };

        Ok(Self {
            host: normalize_host(&required("host")?),
            client_token: required("client_token")?,
            client_secret: required("client_secret")?,
            access_token: required("access_token")?,
            max_body,
        })
    }
}

/// Strips any scheme and trailing slash from an edgerc host value.
fn normalize_host(host: &str) -> String {
    host.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

/// Expands a leading `~` to the user's home directory.
///
/// # Errors
///
/// Returns `ConfigError::NoHomeDir` if expansion is needed but the home
/// directory is unknown.
pub fn expand_tilde(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
