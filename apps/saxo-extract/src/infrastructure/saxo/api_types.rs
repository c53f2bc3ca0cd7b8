//! Saxo OpenAPI request and response types.
//!
//! These types map directly to the OpenAPI's PascalCase JSON.

use serde::{Deserialize, Serialize};

/// Field groups requested for net positions.
pub const NET_POSITION_FIELD_GROUPS: [&str; 9] = [
    "NetPositionView",
    "NetPositionBase",
    "DisplayAndFormat",
    "ExchangeInfo",
    "Greeks",
    "SinglePosition",
    "SinglePositionBase",
    "SinglePositionView",
    "UnderlyingDisplayAndFormat",
];

// ============================================================================
// Request Types
// ============================================================================

/// Subscription request envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubscriptionRequest<'a, A> {
    /// Endpoint-specific arguments.
    pub arguments: A,
    /// Streaming context id.
    pub context_id: &'a str,
    /// Per-subscription reference id.
    pub reference_id: &'a str,
}

/// Arguments of the account subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountArguments<'a> {
    /// Client to list accounts for.
    pub client_key: &'a str,
}

/// Arguments of the net position subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetPositionArguments<'a> {
    /// Client owning the account.
    pub client_key: &'a str,
    /// Account to list positions for.
    pub account_key: &'a str,
    /// Field groups to include.
    pub field_groups: &'a [&'a str],
    /// Price mode, sent as `null`.
    pub price_mode: Option<&'a str>,
}

// ============================================================================
// Response Types
// ============================================================================

/// `clients/me` response. Only the key is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientInfo {
    /// Client key scoping every other call.
    pub client_key: String,
}

/// Account subscription response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSubscriptionResponse {
    /// Initial snapshot.
    pub snapshot: AccountSnapshotData,
}

/// Snapshot payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountSnapshotData {
    /// Accounts.
    #[serde(default)]
    pub data: Vec<AccountEntry>,
}

/// One account in the snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountEntry {
    /// Account key.
    pub account_key: String,
}

/// Error body returned by the OpenAPI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaxoErrorResponse {
    /// Machine-readable code.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

impl SaxoErrorResponse {
    /// `"<code>: <message>"`, or whichever part is present.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        match (&self.error_code, &self.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}
