//! Akamai API invocation.
//!
//! The pipeline only sees the [`Invoker`] trait. [`AkamaiClient`] is the
//! real implementation: EdgeGrid-signed HTTPS calls with an explicit
//! timeout and opt-in retries.

pub mod edgegrid;
pub mod papi;

use std::fmt;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ClientSettings, Credentials};
use crate::error::{ConfigError, InvokeError};
use crate::identifier::ClassifiedIdentifier;
use crate::normalize::record::parse_body;

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

// ============================================================================
// Endpoint descriptor
// ============================================================================

/// Upstream API an identifier is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /diagnostic-tools/v2/url-debug?url=...`
    UrlDebug,
    /// `GET /diagnostic-tools/v2/errors/{code}/translated-error`
    TranslatedError,
    /// Property search followed by `GET .../versions/{v}/rules`
    PropertyRules,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UrlDebug => "/diagnostic-tools/v2/url-debug",
            Self::TranslatedError => "/diagnostic-tools/v2/errors/{code}/translated-error",
            Self::PropertyRules => "/papi/v1/properties/{id}/versions/{version}/rules",
        })
    }
}

// ============================================================================
// Invoker
// ============================================================================

/// Performs the upstream call for a classified identifier.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Calls `endpoint` for `id` and returns the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError` on transport failure, timeout, non-success
    /// status, or a body that is not JSON.
    async fn invoke(
        &self,
        endpoint: Endpoint,
        id: &ClassifiedIdentifier,
    ) -> Result<Value, InvokeError>;
}

// ============================================================================
// Akamai client
// ============================================================================

/// EdgeGrid-authenticated client for the diagnostic and property APIs.
#[derive(Debug)]
pub struct AkamaiClient {
    http: reqwest::Client,
    creds: Credentials,
    settings: ClientSettings,
    base: Url,
}

impl AkamaiClient {
    /// Creates a client for `creds`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the host does not form a valid
    /// base URL, or `InvokeError::Transport` if the HTTP client cannot be
    /// built.
    pub fn new(creds: Credentials, settings: ClientSettings) -> crate::error::Result<Self> {
        let base_str = settings
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}", creds.host));
        let base = Url::parse(&base_str)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "host",
                value: base_str.clone(),
                expected: "a hostname such as akab-xxxx.luna.akamaiapis.net",
            })?;

        let http = reqwest::Client::builder()
            .connect_timeout(settings.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            creds,
            settings,
            base,
        })
    }

    /// Signed GET of `segments` with query `params`.
    ///
    /// # Errors
    ///
    /// See [`Invoker::invoke`].
    pub async fn get(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Value, InvokeError> {
        let url = self.endpoint_url(segments, params);
        self.send(Method::GET, &url, &[]).await
    }

    /// Signed POST of a JSON `body` to `segments`.
    ///
    /// # Errors
    ///
    /// See [`Invoker::invoke`].
    pub async fn post_json(&self, segments: &[&str], body: &Value) -> Result<Value, InvokeError> {
        let url = self.endpoint_url(segments, &[]);
        let bytes = serde_json::to_vec(body).map_err(|e| InvokeError::Transport(e.to_string()))?;
        self.send(Method::POST, &url, &bytes).await
    }

    /// Builds the request URL; each segment is percent-encoded on its own.
    fn endpoint_url(&self, segments: &[&str], params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        let account = self
            .settings
            .account_switch_key
            .as_deref()
            .map(|key| ("accountSwitchKey", key));
        let pairs: Vec<(&str, &str)> = params.iter().copied().chain(account).collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }

    /// Sends with retries on transport failures and 429/5xx answers.
    async fn send(&self, method: Method, url: &Url, body: &[u8]) -> Result<Value, InvokeError> {
        info!(method = %method, path = url.path(), "calling Akamai API");

        let mut attempt = 0;
        loop {
            match self.send_once(&method, url, body).await {
                Err(err) if err.is_retryable() && attempt < self.settings.retries => {
                    attempt += 1;
                    let delay = self.settings.backoff_for(attempt);
                    warn!(attempt, ?delay, error = %err, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, method: &Method, url: &Url, body: &[u8]) -> Result<Value, InvokeError> {
        let auth = edgegrid::authorization(
            &self.creds,
            method,
            url,
            body,
            &edgegrid::timestamp(chrono::Utc::now()),
            &edgegrid::nonce(),
        );

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json");
        if !body.is_empty() {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let timeout = self.settings.timeout;
        let exchange = async {
            let response = req.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| InvokeError::Timeout(timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    InvokeError::Timeout(timeout)
                } else {
                    InvokeError::Transport(e.to_string())
                }
            })?;

        debug!(status = status.as_u16(), bytes = bytes.len(), url = %url, "response received");

        if !status.is_success() {
            return Err(InvokeError::Upstream {
                status: status.as_u16(),
                body: truncate(&String::from_utf8_lossy(&bytes), MAX_ERROR_BODY),
            });
        }

        Ok(parse_body(&bytes)?)
    }
}

#[async_trait]
impl Invoker for AkamaiClient {
    async fn invoke(
        &self,
        endpoint: Endpoint,
        id: &ClassifiedIdentifier,
    ) -> Result<Value, InvokeError> {
        match endpoint {
            Endpoint::UrlDebug => {
                self.get(&["diagnostic-tools", "v2", "url-debug"], &[("url", id.as_str())])
                    .await
            }
            Endpoint::TranslatedError => {
                self.get(
                    &["diagnostic-tools", "v2", "errors", id.as_str(), "translated-error"],
                    &[],
                )
                .await
            }
            Endpoint::PropertyRules => papi::property_rules(self, id.as_str()).await,
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
