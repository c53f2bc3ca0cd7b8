//! Auth Gateway Port (Driven Port)
//!
//! The provider endpoints that make up the browser single-sign-on flow. Each
//! method is one HTTP round-trip over the same cookie-carrying session.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{CallbackForm, OAuthState, ProtocolShapeError};

/// Transport-level failures talking to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request could not be sent or the response not read.
    #[error("network error: {0}")]
    Transport(String),

    /// The response carried a status other than the one the call expects.
    #[error("unexpected status {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        /// Status received.
        status: u16,
        /// Status the call treats as success.
        expected: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body was not the JSON we expected.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// A field required by the protocol was missing.
    #[error(transparent)]
    Shape(#[from] ProtocolShapeError),
}

/// The provider's login endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGatewayPort: Send {
    /// GET the login page HTML.
    async fn fetch_login_page(&mut self) -> Result<String, GatewayError>;

    /// POST an empty body to the authenticate endpoint, returning the first form.
    async fn start_authentication(&mut self) -> Result<Value, GatewayError>;

    /// POST a filled callback form, returning the provider's next document.
    async fn submit_callbacks(&mut self, form: &CallbackForm) -> Result<Value, GatewayError>;

    /// POST the form-encoded authorize decision, returning its JSON document.
    async fn authorize(&mut self, token_id: &str, state: &OAuthState)
    -> Result<Value, GatewayError>;

    /// GET the app bootstrap page that embeds the id token.
    async fn fetch_app_bootstrap(
        &mut self,
        code: &str,
        state: &OAuthState,
    ) -> Result<String, GatewayError>;
}
