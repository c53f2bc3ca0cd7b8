//! Two-Factor Port (Driven Port)
//!
//! The single point where the login blocks on the operator.

use thiserror::Error;

use crate::domain::TwoFactorCode;

/// Failure obtaining a code from the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwoFactorError {
    /// The prompt could not be shown or read.
    #[error("could not read two factor code: {0}")]
    Io(String),

    /// The operator entered something that is not a six-digit code.
    #[error("invalid two factor code: {0}")]
    Invalid(String),
}

/// Source of two-factor codes.
#[cfg_attr(test, mockall::automock)]
pub trait TwoFactorPort: Send {
    /// Block until the operator supplies a code.
    fn request_code(&mut self) -> Result<TwoFactorCode, TwoFactorError>;
}
