//! One extraction run, wired from concrete adapters.
//!
//! The binary calls [`run`] with the terminal prompt; tests call it with a
//! scripted prompt and endpoints pointing at a mock server.

use crate::application::ports::TwoFactorPort;
use crate::application::use_cases::{
    ExtractDataUseCase, ExtractionReport, LoginUseCase, resolve_identity,
};
use crate::config::RunConfig;
use crate::domain::SubscriptionContext;
use crate::error::AppError;
use crate::infrastructure::identity::FileIdentityStore;
use crate::infrastructure::saxo::{SaxoApiClient, SaxoAuthGateway, SessionContext};

/// Log in and fetch every dataset.
///
/// On a first run the device identity is created and saved before login.
pub async fn run<T: TwoFactorPort>(
    config: &RunConfig,
    two_factor: T,
) -> Result<ExtractionReport, AppError> {
    let store = FileIdentityStore::new(config.identity_file.clone());
    let identity = resolve_identity(&store, &config.mode)?;

    let session = SessionContext::new(&config.saxo)?;
    let gateway = SaxoAuthGateway::new(session, config.saxo.endpoints.clone());
    let mut login = LoginUseCase::new(gateway, two_factor);
    let token = login
        .execute(&config.credentials, &identity, &config.mode)
        .await?;
    tracing::info!("Login successful");

    let session = login.into_gateway().into_session();
    let client = SaxoApiClient::new(session, &token, config.saxo.endpoints.clone())?;
    let mut context = SubscriptionContext::generate();
    let report = ExtractDataUseCase::new(client)
        .execute(&config.range, &mut context)
        .await?;

    log_report(&report);
    Ok(report)
}

fn log_report(report: &ExtractionReport) {
    let positions_complete = report.positions.data().is_some_and(|p| p.is_complete());
    tracing::info!(
        transactions = report.transactions.is_fetched(),
        accounts = report.accounts.is_fetched(),
        positions = report.positions.is_fetched(),
        positions_complete,
        "Extraction finished"
    );
}
