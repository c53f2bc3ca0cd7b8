//! Saxo Bank Adapter
//!
//! Talks to the provider's web login and OpenAPI over one browser-like
//! session:
//! - `SessionContext`: cookie jar, fixed User-Agent, scoped header overrides
//! - `SaxoAuthGateway`: the single-sign-on endpoints (`AuthGatewayPort`)
//! - `SaxoApiClient`: the authenticated data API (`PortfolioDataPort`)

mod api_client;
mod api_types;
mod auth_gateway;
mod config;
mod error;
mod session;

pub use api_client::SaxoApiClient;
pub use auth_gateway::SaxoAuthGateway;
pub use config::{SaxoConfig, SaxoEndpoints, USER_AGENT};
pub use error::SaxoError;
pub use session::{ScopedHeader, SessionContext};
