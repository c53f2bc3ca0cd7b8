//! JSON file identity store.
//!
//! The identity is written as `{"identifier": "...", "metadata": "..."}` so
//! the file is portable and can be inspected by hand. Writes go to a sibling
//! temp file first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::ports::{IdentityStoreError, IdentityStorePort};
use crate::domain::DeviceIdentity;

/// Default identity file name, relative to the working directory.
pub const IDENTITY_FILENAME: &str = "identity.json";

/// Identity store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl Default for FileIdentityStore {
    fn default() -> Self {
        Self::new(IDENTITY_FILENAME)
    }
}

impl FileIdentityStore {
    /// Store at an explicit path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `dir/identity.json`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(IDENTITY_FILENAME))
    }

    /// The file backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, identity: &DeviceIdentity) -> Result<(), IdentityStoreError> {
        let bytes = serde_json::to_vec_pretty(identity)
            .map_err(|e| IdentityStoreError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl IdentityStorePort for FileIdentityStore {
    fn create(&self) -> Result<DeviceIdentity, IdentityStoreError> {
        if self.path.exists() {
            tracing::warn!(
                path = %self.path.display(),
                "Replacing existing device identity; the provider will ask for two factor again"
            );
        }
        let identity = DeviceIdentity::generate();
        self.save(&identity)?;
        tracing::info!(path = %self.path.display(), "Identity file saved");
        Ok(identity)
    }

    fn load(&self) -> Result<DeviceIdentity, IdentityStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IdentityStoreError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let identity: DeviceIdentity = serde_json::from_slice(&bytes)
            .map_err(|e| IdentityStoreError::Serialization(e.to_string()))?;
        if !identity.is_well_formed() {
            tracing::warn!(
                path = %self.path.display(),
                "Stored device identifier does not have the expected shape"
            );
        }
        Ok(identity)
    }
}
