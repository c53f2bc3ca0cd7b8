//! Domain layer - pure values for the login protocol and data extraction.
//!
//! Nothing in here performs I/O. The HTTP session, the identity file and the
//! operator prompt all live behind ports in the application layer.

pub mod callback_form;
pub mod credentials;
pub mod date_range;
pub mod extract;
pub mod identity;
pub mod oauth_state;
pub mod subscription;

pub use callback_form::CallbackForm;
pub use credentials::{BearerToken, Credentials, LoginMode, TwoFactorCode};
pub use date_range::{DateRange, ValidationError};
pub use extract::{ProtocolShapeError, extract_between};
pub use identity::DeviceIdentity;
pub use oauth_state::OAuthState;
pub use subscription::SubscriptionContext;
