//! Driven ports.
//!
//! Adapters in `infrastructure` implement these; use cases depend only on the
//! traits so the whole login protocol can be driven by mocks in tests.

mod auth_gateway_port;
mod identity_store_port;
mod portfolio_data_port;
mod two_factor_port;

pub use auth_gateway_port::{AuthGatewayPort, GatewayError};
pub use identity_store_port::{IdentityStoreError, IdentityStorePort};
pub use portfolio_data_port::{AccountSnapshot, PortfolioDataPort};
pub use two_factor_port::{TwoFactorError, TwoFactorPort};

#[cfg(test)]
pub use auth_gateway_port::MockAuthGatewayPort;
#[cfg(test)]
pub use identity_store_port::MockIdentityStorePort;
#[cfg(test)]
pub use portfolio_data_port::MockPortfolioDataPort;
#[cfg(test)]
pub use two_factor_port::MockTwoFactorPort;
