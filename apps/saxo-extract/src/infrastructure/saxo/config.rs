//! Saxo adapter configuration.

use std::time::Duration;

/// Browser User-Agent sent with every request. The web login behaves
/// differently for agents it does not recognise as a current browser.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; rv:122.0) Gecko/20100101 Firefox/122.0";

/// Host serving the web login, the bootstrap page and client info.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://www.saxoinvestor.dk";

/// Host serving the OpenAPI data endpoints.
pub const DEFAULT_DATA_BASE_URL: &str = "https://www.saxotrader.com";

/// OAuth scope, already form-encoded.
pub const OAUTH_SCOPE: &str = "openid%20profile%20openapi%20fr%3Aidm%3A*";

/// OAuth client id of the web platform.
pub const OAUTH_CLIENT_ID: &str = "SaxoInvestorPlatform";

/// OAuth redirect URI, already form-encoded.
pub const OAUTH_REDIRECT_URI: &str = "https%3A%2F%2Fwww.saxoinvestor.dk%2Fapi%2Flogin%2Fcode";

/// Provider endpoints, rooted at two hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaxoEndpoints {
    auth_base_url: String,
    data_base_url: String,
}

impl Default for SaxoEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_BASE_URL, DEFAULT_DATA_BASE_URL)
    }
}

impl SaxoEndpoints {
    /// Endpoints rooted at custom hosts. Trailing slashes are ignored.
    #[must_use]
    pub fn new(auth_base_url: impl Into<String>, data_base_url: impl Into<String>) -> Self {
        Self {
            auth_base_url: auth_base_url.into().trim_end_matches('/').to_string(),
            data_base_url: data_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Login page carrying the correlation id.
    #[must_use]
    pub fn login_page(&self) -> String {
        format!("{}/Login/da", self.auth_base_url)
    }

    /// Authentication tree endpoint.
    #[must_use]
    pub fn authenticate(&self) -> String {
        format!(
            "{}/am/json/realms/root/realms/dca/authenticate?authIndexType=service&authIndexValue=authn-web-v6",
            self.auth_base_url
        )
    }

    /// OAuth authorize endpoint.
    #[must_use]
    pub fn authorize(&self) -> String {
        format!("{}/am/oauth2/realms/root/realms/dca/authorize", self.auth_base_url)
    }

    /// App bootstrap page for an authorization code.
    #[must_use]
    pub fn app_bootstrap(&self, code: &str, state: &str) -> String {
        format!("{}/showapp?code={code}&state={state}", self.auth_base_url)
    }

    /// Client info (`ClientKey`).
    #[must_use]
    pub fn client_info(&self) -> String {
        format!("{}/openapi/port/v1/clients/me", self.auth_base_url)
    }

    /// Historical transactions.
    #[must_use]
    pub fn transactions(&self) -> String {
        format!("{}/openapi/hist/v1/transactions", self.data_base_url)
    }

    /// Account subscriptions.
    #[must_use]
    pub fn account_subscriptions(&self) -> String {
        format!("{}/openapi/port/v1/accounts/subscriptions", self.data_base_url)
    }

    /// Net position subscriptions.
    #[must_use]
    pub fn net_position_subscriptions(&self) -> String {
        format!("{}/openapi/port/v1/netpositions/subscriptions", self.data_base_url)
    }
}

/// Configuration for the Saxo session.
#[derive(Debug, Clone)]
pub struct SaxoConfig {
    /// Provider endpoints.
    pub endpoints: SaxoEndpoints,
    /// User-Agent for the session.
    pub user_agent: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for SaxoConfig {
    fn default() -> Self {
        Self {
            endpoints: SaxoEndpoints::default(),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl SaxoConfig {
    /// Configuration for custom endpoints.
    #[must_use]
    pub fn new(endpoints: SaxoEndpoints) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }

    /// Set a bounded request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Form-encoded body of the authorize decision.
#[must_use]
pub fn authorize_body(token_id: &str, encoded_state: &str) -> String {
    format!(
        "csrf={token_id}&scope={OAUTH_SCOPE}&response_type=code&client_id={OAUTH_CLIENT_ID}\
         &redirect_uri={OAUTH_REDIRECT_URI}&decision=allow&state={encoded_state}"
    )
}
