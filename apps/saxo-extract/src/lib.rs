// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Saxo Extract - Rust Core Library
//!
//! Logs in to Saxo Bank the way the browser does and pulls the account
//! holder's own transactions, accounts and net positions.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: pure values of the login protocol
//!   - `identity`: persisted device identity
//!   - `callback_form`: the multi-step authentication form
//!   - `oauth_state`, `extract`: state parameter and page scraping
//!   - `date_range`, `credentials`, `subscription`
//!
//! - **Application**: use cases and ports
//!   - `ports`: `AuthGatewayPort`, `PortfolioDataPort`, `IdentityStorePort`, `TwoFactorPort`
//!   - `use_cases`: `LoginUseCase`, `ExtractDataUseCase`
//!
//! - **Infrastructure**: adapters
//!   - `saxo`: HTTP session, SSO gateway, OpenAPI client
//!   - `identity`: JSON identity file
//!   - `prompt`: terminal two-factor prompt

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Hexagonal Layers
// =============================================================================

/// Domain layer - protocol values with no I/O.
pub mod domain;

/// Application layer - use cases and port definitions.
pub mod application;

/// Infrastructure layer - adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Binary support
// =============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::{
    BearerToken, CallbackForm, Credentials, DateRange, DeviceIdentity, LoginMode, OAuthState,
    SubscriptionContext, TwoFactorCode, ValidationError,
};

pub use application::ports::{
    AuthGatewayPort, IdentityStorePort, PortfolioDataPort, TwoFactorError, TwoFactorPort,
};
pub use application::use_cases::{
    DatasetOutcome, ExtractDataUseCase, ExtractionReport, LoginError, LoginUseCase,
};

pub use infrastructure::identity::FileIdentityStore;
pub use infrastructure::prompt::TerminalTwoFactorPrompt;
pub use infrastructure::saxo::{
    SaxoApiClient, SaxoAuthGateway, SaxoConfig, SaxoEndpoints, SaxoError, SessionContext,
};

pub use app::run;
pub use config::{Cli, RunConfig};
pub use error::AppError;
