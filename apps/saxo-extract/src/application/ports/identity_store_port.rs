//! Identity Store Port (Driven Port)
//!
//! Write-once, read-many storage for the device identity.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DeviceIdentity;

/// Errors from the identity store.
#[derive(Debug, Error)]
pub enum IdentityStoreError {
    /// No identity has been stored yet.
    #[error("no device identity found at {}", path.display())]
    NotFound {
        /// Where the store looked.
        path: PathBuf,
    },

    /// The stored identity could not be read or written.
    #[error("identity store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not a device identity.
    #[error("identity file is corrupt: {0}")]
    Serialization(String),
}

/// Persistence for the device identity.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStorePort: Send + Sync {
    /// Generate a new identity, persist it (overwriting any previous one) and return it.
    ///
    /// Overwriting a trusted identity forces two-factor on the next login.
    fn create(&self) -> Result<DeviceIdentity, IdentityStoreError>;

    /// Load the persisted identity unchanged.
    fn load(&self) -> Result<DeviceIdentity, IdentityStoreError>;
}
