//! Authenticated OpenAPI client.
//!
//! Every call is a single request: check the one status the endpoint uses for
//! success, then decode JSON. There is no retry; the caller decides whether a
//! failed dataset stops the run.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::api_types::{
    AccountArguments, AccountSubscriptionResponse, ClientInfo, NET_POSITION_FIELD_GROUPS,
    NetPositionArguments, SaxoErrorResponse, SubscriptionRequest,
};
use super::config::SaxoEndpoints;
use super::error::SaxoError;
use super::session::SessionContext;
use crate::application::ports::{AccountSnapshot, GatewayError, PortfolioDataPort};
use crate::domain::{BearerToken, DateRange};

/// Data API client bound to a logged-in session.
#[derive(Debug)]
pub struct SaxoApiClient {
    session: SessionContext,
    endpoints: SaxoEndpoints,
}

impl SaxoApiClient {
    /// Attach the bearer token to the session for all following calls.
    pub fn new(
        mut session: SessionContext,
        token: &BearerToken,
        endpoints: SaxoEndpoints,
    ) -> Result<Self, SaxoError> {
        session.set_header(AUTHORIZATION, &token.header_value())?;
        Ok(Self { session, endpoints })
    }

    async fn get_client_info(&self) -> Result<ClientInfo, SaxoError> {
        let response = self.session.get(&self.endpoints.client_info()).await?;
        decode(response, StatusCode::OK).await
    }

    async fn fetch_transactions(
        &self,
        client_key: &str,
        range: &DateRange,
    ) -> Result<Value, SaxoError> {
        let from = range.from_param();
        let to = range.to_param();
        let response = self
            .session
            .get_with_query(
                &self.endpoints.transactions(),
                &[
                    ("ClientKey", client_key),
                    ("FromDate", from.as_str()),
                    ("ToDate", to.as_str()),
                ],
            )
            .await?;
        decode(response, StatusCode::OK).await
    }

    async fn subscribe_accounts(
        &self,
        client_key: &str,
        context_id: &str,
        reference_id: &str,
    ) -> Result<AccountSnapshot, SaxoError> {
        let request = SubscriptionRequest {
            arguments: AccountArguments { client_key },
            context_id,
            reference_id,
        };
        let response = self
            .session
            .post_json(&self.endpoints.account_subscriptions(), &request)
            .await?;
        let raw: Value = decode(response, StatusCode::CREATED).await?;
        let parsed: AccountSubscriptionResponse = serde_json::from_value(raw.clone())
            .map_err(|_| SaxoError::MissingField("Snapshot.Data[].AccountKey".to_string()))?;
        Ok(AccountSnapshot {
            account_keys: parsed
                .snapshot
                .data
                .into_iter()
                .map(|a| a.account_key)
                .collect(),
            raw,
        })
    }

    async fn subscribe_net_positions(
        &self,
        client_key: &str,
        account_key: &str,
        context_id: &str,
        reference_id: &str,
    ) -> Result<Value, SaxoError> {
        let request = SubscriptionRequest {
            arguments: NetPositionArguments {
                client_key,
                account_key,
                field_groups: &NET_POSITION_FIELD_GROUPS,
                price_mode: None,
            },
            context_id,
            reference_id,
        };
        let response = self
            .session
            .post_json(&self.endpoints.net_position_subscriptions(), &request)
            .await?;
        decode(response, StatusCode::CREATED).await
    }
}

#[async_trait]
impl PortfolioDataPort for SaxoApiClient {
    async fn get_client_key(&self) -> Result<String, GatewayError> {
        let info = self.get_client_info().await?;
        tracing::debug!("Got client key");
        Ok(info.client_key)
    }

    async fn get_transactions(
        &self,
        client_key: &str,
        range: &DateRange,
    ) -> Result<Value, GatewayError> {
        Ok(self.fetch_transactions(client_key, range).await?)
    }

    async fn list_account_subscriptions(
        &self,
        client_key: &str,
        context_id: &str,
        reference_id: &str,
    ) -> Result<AccountSnapshot, GatewayError> {
        Ok(self
            .subscribe_accounts(client_key, context_id, reference_id)
            .await?)
    }

    async fn get_net_positions(
        &self,
        client_key: &str,
        account_key: &str,
        context_id: &str,
        reference_id: &str,
    ) -> Result<Value, GatewayError> {
        Ok(self
            .subscribe_net_positions(client_key, account_key, context_id, reference_id)
            .await?)
    }
}

/// Require `expected` and decode the body.
async fn decode<T: DeserializeOwned>(
    response: Response,
    expected: StatusCode,
) -> Result<T, SaxoError> {
    let status = response.status();
    let text = response.text().await?;

    if status != expected {
        let message = serde_json::from_str::<SaxoErrorResponse>(&text)
            .ok()
            .and_then(|e| e.describe())
            .unwrap_or(text);
        tracing::warn!(
            status = status.as_u16(),
            expected = expected.as_u16(),
            message = %message,
            "Unexpected API status"
        );
        return Err(SaxoError::UnexpectedStatus {
            status: status.as_u16(),
            expected: expected.as_u16(),
            message,
        });
    }

    if text.is_empty() {
        return serde_json::from_str("null").map_err(|e| SaxoError::JsonParse(e.to_string()));
    }
    serde_json::from_str(&text).map_err(|e| SaxoError::JsonParse(e.to_string()))
}
