//! Login gateway over the shared session.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

use super::config::{SaxoEndpoints, authorize_body};
use super::error::SaxoError;
use super::session::{SessionContext, success_text};
use crate::application::ports::{AuthGatewayPort, GatewayError};
use crate::domain::{CallbackForm, OAuthState};

/// Form content type for the authorize decision.
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The provider's single-sign-on endpoints.
#[derive(Debug)]
pub struct SaxoAuthGateway {
    session: SessionContext,
    endpoints: SaxoEndpoints,
}

impl SaxoAuthGateway {
    /// Create a gateway over a fresh session.
    #[must_use]
    pub const fn new(session: SessionContext, endpoints: SaxoEndpoints) -> Self {
        Self { session, endpoints }
    }

    /// Give back the session, with the login cookies it collected.
    #[must_use]
    pub fn into_session(self) -> SessionContext {
        self.session
    }

    async fn json(response: reqwest::Response) -> Result<Value, SaxoError> {
        let text = success_text(response).await?;
        serde_json::from_str(&text).map_err(|e| SaxoError::JsonParse(e.to_string()))
    }
}

#[async_trait]
impl AuthGatewayPort for SaxoAuthGateway {
    async fn fetch_login_page(&mut self) -> Result<String, GatewayError> {
        let response = self.session.get(&self.endpoints.login_page()).await?;
        Ok(success_text(response).await?)
    }

    async fn start_authentication(&mut self) -> Result<Value, GatewayError> {
        let response = self
            .session
            .post_empty(&self.endpoints.authenticate())
            .await?;
        Ok(Self::json(response).await?)
    }

    async fn submit_callbacks(&mut self, form: &CallbackForm) -> Result<Value, GatewayError> {
        let response = self
            .session
            .post_json(&self.endpoints.authenticate(), form.as_value())
            .await?;
        Ok(Self::json(response).await?)
    }

    async fn authorize(
        &mut self,
        token_id: &str,
        state: &OAuthState,
    ) -> Result<Value, GatewayError> {
        let url = self.endpoints.authorize();
        let body = authorize_body(token_id, state.encoded());
        let scoped = self
            .session
            .scoped_header(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        let response = scoped.post_body(&url, body).await?;
        drop(scoped);
        Ok(Self::json(response).await?)
    }

    async fn fetch_app_bootstrap(
        &mut self,
        code: &str,
        state: &OAuthState,
    ) -> Result<String, GatewayError> {
        let url = self.endpoints.app_bootstrap(code, state.encoded());
        let response = self.session.get(&url).await?;
        Ok(success_text(response).await?)
    }
}
