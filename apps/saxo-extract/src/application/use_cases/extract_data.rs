//! Extract Data Use Case
//!
//! Runs the authenticated reads after login: client key, transactions,
//! accounts and net positions per account.
//!
//! Only the client key is fatal, since every other call is scoped by it.
//! The remaining datasets are independent: a failed transactions call is
//! reported and the run continues with accounts. Position extraction stops at
//! the first failing account, keeping what was fetched before it.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::application::ports::{GatewayError, PortfolioDataPort};
use crate::domain::{DateRange, SubscriptionContext};

/// Fatal extraction error.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The client key could not be fetched; no other call can be made.
    #[error("could not fetch client key: {0}")]
    ClientKey(#[source] GatewayError),
}

/// Outcome of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetOutcome<T> {
    /// The data was fetched.
    Fetched {
        /// The dataset.
        data: T,
    },
    /// The call failed.
    Failed {
        /// Why.
        reason: String,
    },
    /// Not attempted because a prerequisite failed.
    Skipped,
}

impl<T> DatasetOutcome<T> {
    /// Whether the dataset was fetched.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    /// The fetched data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Fetched { data } => Some(data),
            _ => None,
        }
    }
}

/// Net positions for one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountPositions {
    /// The account.
    pub account_key: String,
    /// Raw net position subscription snapshot.
    pub positions: Value,
}

/// Positions collected across accounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionsReport {
    /// Positions of every account fetched before any failure.
    pub accounts: Vec<AccountPositions>,
    /// Account whose positions failed, stopping the loop.
    pub failed_account: Option<String>,
    /// Failure reason for `failed_account`.
    pub failure: Option<String>,
}

impl PositionsReport {
    /// Whether every account's positions were fetched.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed_account.is_none()
    }
}

/// Everything collected in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionReport {
    /// The client the data belongs to.
    pub client_key: String,
    /// Transactions in the requested range.
    pub transactions: DatasetOutcome<Value>,
    /// Account subscription snapshot.
    pub accounts: DatasetOutcome<Value>,
    /// Net positions per account.
    pub positions: DatasetOutcome<PositionsReport>,
}

/// Orchestrates the data API calls.
#[derive(Debug)]
pub struct ExtractDataUseCase<P> {
    data: P,
}

impl<P: PortfolioDataPort> ExtractDataUseCase<P> {
    /// Create a new extract use case.
    pub const fn new(data: P) -> Self {
        Self { data }
    }

    /// Fetch every dataset for `range`.
    #[tracing::instrument(skip_all, fields(from = %range.from(), to = %range.to()))]
    pub async fn execute(
        &self,
        range: &DateRange,
        context: &mut SubscriptionContext,
    ) -> Result<ExtractionReport, ExtractError> {
        let client_key = self
            .data
            .get_client_key()
            .await
            .map_err(ExtractError::ClientKey)?;
        tracing::info!("Getting transaction data");

        let transactions = match self.data.get_transactions(&client_key, range).await {
            Ok(data) => {
                tracing::info!("Transactions extracted");
                DatasetOutcome::Fetched { data }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Extracting transactions failed");
                DatasetOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        tracing::info!("Getting list of accounts");
        let reference_id = context.next_reference_id();
        let (accounts, positions) = match self
            .data
            .list_account_subscriptions(&client_key, context.context_id(), &reference_id)
            .await
        {
            Ok(snapshot) => {
                tracing::info!(accounts = snapshot.account_keys.len(), "Got list of accounts");
                let positions = self
                    .positions(&client_key, &snapshot.account_keys, context)
                    .await;
                (DatasetOutcome::Fetched { data: snapshot.raw }, positions)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get list of accounts");
                (
                    DatasetOutcome::Failed {
                        reason: e.to_string(),
                    },
                    DatasetOutcome::Skipped,
                )
            }
        };

        Ok(ExtractionReport {
            client_key,
            transactions,
            accounts,
            positions,
        })
    }

    async fn positions(
        &self,
        client_key: &str,
        account_keys: &[String],
        context: &mut SubscriptionContext,
    ) -> DatasetOutcome<PositionsReport> {
        let mut report = PositionsReport {
            accounts: Vec::with_capacity(account_keys.len()),
            failed_account: None,
            failure: None,
        };

        for account_key in account_keys {
            let reference_id = context.next_reference_id();
            match self
                .data
                .get_net_positions(client_key, account_key, context.context_id(), &reference_id)
                .await
            {
                Ok(positions) => report.accounts.push(AccountPositions {
                    account_key: account_key.clone(),
                    positions,
                }),
                Err(e) => {
                    tracing::warn!(
                        account_key = %account_key,
                        error = %e,
                        "Failed to get positions for account, stopping"
                    );
                    let reason = e.to_string();
                    report.failed_account = Some(account_key.clone());
                    report.failure = Some(reason.clone());
                    if report.accounts.is_empty() {
                        return DatasetOutcome::Failed { reason };
                    }
                    return DatasetOutcome::Fetched { data: report };
                }
            }
        }

        tracing::info!(accounts = report.accounts.len(), "Positions extracted");
        DatasetOutcome::Fetched { data: report }
    }
}
