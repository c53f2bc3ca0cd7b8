//! Top-level error for a run.
//!
//! Every fatal failure funnels into [`AppError`]; the binary prints it as one
//! line and exits non-zero. Failures of individual datasets are not errors
//! here, they are reported in the extraction report.

use thiserror::Error;

use crate::application::use_cases::{ExtractError, LoginError};
use crate::domain::ValidationError;
use crate::infrastructure::saxo::SaxoError;

/// Exit code for rejected arguments.
pub const EXIT_VALIDATION: u8 = 2;

/// Exit code for every other fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Fatal run error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Date arguments were rejected before any side effect.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Login could not complete.
    #[error(transparent)]
    Login(#[from] LoginError),

    /// The data API could not be used at all.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The HTTP session could not be set up.
    #[error(transparent)]
    Session(#[from] SaxoError),

    /// The report could not be written to stdout.
    #[error("could not write output: {0}")]
    Output(String),
}

impl AppError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => EXIT_VALIDATION,
            _ => EXIT_FAILURE,
        }
    }
}
