//! Portfolio Data Port (Driven Port)
//!
//! Authenticated OpenAPI reads used after login.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::auth_gateway_port::GatewayError;
use crate::domain::DateRange;

/// Result of the account subscription call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    /// `AccountKey` of every account, in snapshot order.
    pub account_keys: Vec<String>,
    /// The raw response document.
    pub raw: Value,
}

/// Authenticated data API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortfolioDataPort: Send + Sync {
    /// `ClientKey` of the logged-in client (expects 200).
    async fn get_client_key(&self) -> Result<String, GatewayError>;

    /// Transactions in `range` (expects 200).
    async fn get_transactions(
        &self,
        client_key: &str,
        range: &DateRange,
    ) -> Result<Value, GatewayError>;

    /// Subscribe to the client's accounts (expects 201).
    async fn list_account_subscriptions(
        &self,
        client_key: &str,
        context_id: &str,
        reference_id: &str,
    ) -> Result<AccountSnapshot, GatewayError>;

    /// Subscribe to net positions of one account (expects 201).
    async fn get_net_positions(
        &self,
        client_key: &str,
        account_key: &str,
        context_id: &str,
        reference_id: &str,
    ) -> Result<Value, GatewayError>;
}
