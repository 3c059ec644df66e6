//! Configuration module
//!
//! Credentials come from an EdgeGrid `.edgerc` file; transport settings come
//! from the command line (with environment fallbacks).

pub mod edgerc;

use std::time::Duration;

pub use edgerc::{Credentials, DEFAULT_EDGERC, DEFAULT_SECTION, expand_tilde};

/// Default bound on a single HTTP exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// First retry delay; doubles per attempt.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Transport settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Bound on connect + response for each request.
    pub timeout: Duration,
    /// Extra attempts after a retryable failure; 0 disables retries.
    pub retries: u32,
    /// Delay before the first retry.
    pub backoff: Duration,
    /// Value of `accountSwitchKey` appended to every request.
    pub account_switch_key: Option<String>,
    /// Overrides `https://<host>` as the request base.
    pub base_url: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            backoff: DEFAULT_BACKOFF,
            account_switch_key: None,
            base_url: None,
        }
    }
}

impl ClientSettings {
    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}
