//! Secrets supplied by the operator or produced by the login flow.
//!
//! None of these are ever persisted. `Debug` redacts every secret so values
//! can sit in structured log fields safely.

/// Device display name used when the operator does not pick one.
pub const DEFAULT_DEVICE_NAME: &str = "SaxoPython";

/// Username and password for the web login.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The login username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The login password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Whether this run registers a new device (two-factor) or reuses a trusted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginMode {
    /// First run: answer the two-factor challenge and name the device.
    FirstRun {
        /// Display name shown in the provider's device list.
        device_name: String,
    },
    /// The device identity is already trusted; two-factor is skipped.
    Returning,
}

impl LoginMode {
    /// Whether two-factor is expected.
    #[must_use]
    pub const fn is_first_run(&self) -> bool {
        matches!(self, Self::FirstRun { .. })
    }
}

/// A six-digit two-factor code.
#[derive(Clone, PartialEq, Eq)]
pub struct TwoFactorCode(String);

impl TwoFactorCode {
    /// Validate and wrap a code. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, &'static str> {
        let code = input.trim();
        if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(code.to_string()))
        } else {
            Err("two factor code must be exactly six digits")
        }
    }

    /// The code digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TwoFactorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TwoFactorCode([REDACTED])")
    }
}

/// The id token presented as `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Bearer <token>` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(len={})", self.0.len())
    }
}
