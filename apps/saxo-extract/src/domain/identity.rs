//! Device identity presented to the provider during login.
//!
//! The provider ties device trust to the exact identifier string. Once an
//! identity has been registered through a two-factor login, later logins that
//! present the same identifier skip the two-factor step.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of digit groups in an identifier.
const GROUPS: usize = 3;

/// Digits per group.
const GROUP_LEN: usize = 10;

/// A locally generated device identifier, e.g. `0123456789-0123456789-0123456789`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    identifier: String,
    #[serde(default)]
    metadata: String,
}

impl DeviceIdentity {
    /// Generate a fresh identity from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let identifier = (0..GROUPS)
            .map(|_| random_digits(GROUP_LEN))
            .collect::<Vec<_>>()
            .join("-");
        Self {
            identifier,
            metadata: String::new(),
        }
    }

    /// Rebuild an identity from stored parts.
    #[must_use]
    pub const fn from_parts(identifier: String, metadata: String) -> Self {
        Self {
            identifier,
            metadata,
        }
    }

    /// The identifier string.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Opaque metadata, currently always empty.
    #[must_use]
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// Whether the identifier has the `DDDDDDDDDD-DDDDDDDDDD-DDDDDDDDDD` shape.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let groups: Vec<&str> = self.identifier.split('-').collect();
        groups.len() == GROUPS
            && groups
                .iter()
                .all(|g| g.len() == GROUP_LEN && g.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Compact JSON form submitted in the device callback slot:
    /// `{"identifier":"...","metadata":"..."}`.
    #[must_use]
    pub fn to_callback_value(&self) -> String {
        serde_json::json!({
            "identifier": self.identifier,
            "metadata": self.metadata,
        })
        .to_string()
    }
}

/// `len` decimal digits drawn from the thread-local CSPRNG.
///
/// `rand::rng()` is a ChaCha-based generator seeded from the OS, suitable for
/// identifiers the provider uses as a device secret.
pub(crate) fn random_digits(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
