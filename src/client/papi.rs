//! Property Manager lookups behind the `origins` subcommand.
//!
//! A hostname is resolved to the property version active on the production
//! network, and that version's rule tree is fetched.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::AkamaiClient;
use crate::error::{InvokeError, NormalizeError};

/// Production status of an activated property version.
const ACTIVE: &str = "ACTIVE";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    versions: SearchVersions,
}

#[derive(Debug, Deserialize)]
struct SearchVersions {
    #[serde(default)]
    items: Vec<PropertyVersion>,
}

/// One property version matched by a hostname search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyVersion {
    /// Property identifier (`prp_...`).
    pub property_id: String,
    /// Property name, when upstream includes it.
    #[serde(default)]
    pub property_name: Option<String>,
    /// Version number.
    pub property_version: u64,
    /// Contract identifier (`ctr_...`).
    pub contract_id: String,
    /// Group identifier (`grp_...`).
    pub group_id: String,
    /// Production network status.
    #[serde(default)]
    pub production_status: Option<String>,
}

/// Picks the first version active on production from a search response.
///
/// # Errors
///
/// Returns `NormalizeError::UnexpectedShape` if the response has no
/// `versions` list.
pub fn active_version(search: &Value) -> Result<Option<PropertyVersion>, NormalizeError> {
    let parsed: SearchResponse = serde_json::from_value(search.clone())
        .map_err(|e| NormalizeError::UnexpectedShape(format!("property search: {e}")))?;

    Ok(parsed
        .versions
        .items
        .into_iter()
        .find(|v| v.production_status.as_deref() == Some(ACTIVE)))
}

/// Fetches the rule tree of the production property serving `hostname`.
///
/// # Errors
///
/// Returns `InvokeError::NotFound` when no production-active property
/// carries the hostname, and any error from the underlying calls.
pub async fn property_rules(client: &AkamaiClient, hostname: &str) -> Result<Value, InvokeError> {
    let search = client
        .post_json(
            &["papi", "v1", "search", "find-by-value"],
            &json!({ "hostname": hostname }),
        )
        .await?;

    let version = active_version(&search)?.ok_or_else(|| {
        InvokeError::NotFound(format!(
            "no production-active property for hostname '{hostname}' \
             (hostname incorrect or no access to the property)"
        ))
    })?;

    info!(
        property_id = %version.property_id,
        property_name = version.property_name.as_deref().unwrap_or("-"),
        version = version.property_version,
        "found active property"
    );

    let version_number = version.property_version.to_string();
    let rules = client
        .get(
            &[
                "papi",
                "v1",
                "properties",
                version.property_id.as_str(),
                "versions",
                version_number.as_str(),
                "rules",
            ],
            &[
                ("contractId", version.contract_id.as_str()),
                ("groupId", version.group_id.as_str()),
                ("validateMode", "fast"),
                ("validateRules", "false"),
            ],
        )
        .await?;

    debug!("fetched property rule tree");
    Ok(rules)
}
