//! OAuth `state` parameter derived from the login page's correlation id.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Application id the web client reports in the state document.
pub const APP_ID: &str = "investor";

/// The OAuth state: `{"appId":"investor","correlationId":"<id>"}`, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthState {
    correlation_id: String,
    encoded: String,
}

impl OAuthState {
    /// Build the state for a correlation id.
    #[must_use]
    pub fn new(correlation_id: impl Into<String>) -> Self {
        let correlation_id = correlation_id.into();
        let document = serde_json::json!({
            "appId": APP_ID,
            "correlationId": correlation_id,
        })
        .to_string();
        Self {
            encoded: STANDARD.encode(document),
            correlation_id,
        }
    }

    /// The raw correlation id.
    #[must_use]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Base64 of the state document, sent verbatim in query strings and forms.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}
