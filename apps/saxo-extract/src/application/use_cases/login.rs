//! Login Use Case
//!
//! Replays the provider's browser single-sign-on flow and yields a bearer
//! token for the data API.
//!
//! # Stages
//!
//! 1. Fetch the login page and cut out the correlation id
//! 2. Start the authentication tree (empty POST) to get the first form
//! 3. Submit username, redirect URL, application name and device identity
//! 4. Submit username and password; a `retryCredentialsPage` stage is fatal
//! 5. First run only: submit the two-factor code, then the device name
//! 6. Authorize with the session token id, then read the id token from the
//!    app bootstrap page
//!
//! Every stage depends on the previous stage's response. Nothing is retried:
//! any failure aborts the login and the partial session is discarded.

use serde_json::Value;
use thiserror::Error;

use crate::application::ports::{
    AuthGatewayPort, GatewayError, IdentityStoreError, IdentityStorePort, TwoFactorError,
    TwoFactorPort,
};
use crate::domain::callback_form::{is_credentials_retry, token_id_of};
use crate::domain::{
    BearerToken, CallbackForm, Credentials, DeviceIdentity, LoginMode, OAuthState,
    ProtocolShapeError, extract_between,
};

/// Redirect URL submitted in the identity claim.
pub const REDIRECT_URL: &str = "https://www.saxoinvestor.dk/investor";

/// Application name submitted in the identity claim.
pub const APPLICATION_NAME: &str = "SaxoInvestor";

/// Marker preceding the correlation id on the login page.
pub const CORRELATION_ID_MARKER: &str = r#""correlationId":""#;

/// Marker preceding the id token on the app bootstrap page.
pub const ID_TOKEN_MARKER: &str = r#","idToken":""#;

/// Errors that abort the login.
#[derive(Debug, Error)]
pub enum LoginError {
    /// Returning run without a stored device identity.
    #[error(
        "the program was launched without first-run mode, but no identity file was found ({0}). \
         Run again with -f/--firstrun."
    )]
    IdentityNotFound(String),

    /// The identity store failed for another reason.
    #[error(transparent)]
    IdentityStore(IdentityStoreError),

    /// A provider response lacked an expected marker or field.
    #[error("login failed at {stage}: {source}")]
    ProtocolShape {
        /// Stage that failed.
        stage: LoginStage,
        /// What was missing.
        source: ProtocolShapeError,
    },

    /// The provider rejected the username/password.
    #[error(
        "login failed, probably due to a wrong username/password combination. \
         Please double check and try again."
    )]
    Authentication,

    /// The operator could not supply a two-factor code.
    #[error(transparent)]
    TwoFactor(#[from] TwoFactorError),

    /// A request failed at the transport level.
    #[error("login failed at {stage}: {source}")]
    Transport {
        /// Stage that failed.
        stage: LoginStage,
        /// Underlying gateway failure.
        source: GatewayError,
    },
}

impl LoginError {
    fn at(stage: LoginStage) -> impl FnOnce(GatewayError) -> Self {
        move |source| match source {
            GatewayError::Shape(source) => Self::ProtocolShape { stage, source },
            source => Self::Transport { stage, source },
        }
    }

    fn shape(stage: LoginStage) -> impl FnOnce(ProtocolShapeError) -> Self {
        move |source| Self::ProtocolShape { stage, source }
    }
}

/// Login protocol stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    /// GET login page.
    FetchLoginPage,
    /// Empty POST to start the tree.
    InitAuth,
    /// Username, redirect, application and device identity.
    SubmitIdentityClaim,
    /// Username and password.
    SubmitCredentials,
    /// Two-factor code.
    SubmitTwoFactor,
    /// Device display name.
    RegisterDevice,
    /// OAuth authorize decision.
    Authorize,
    /// Id token from the bootstrap page.
    ExtractToken,
}

impl std::fmt::Display for LoginStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FetchLoginPage => "fetch login page",
            Self::InitAuth => "start authentication",
            Self::SubmitIdentityClaim => "submit identity claim",
            Self::SubmitCredentials => "submit credentials",
            Self::SubmitTwoFactor => "submit two factor code",
            Self::RegisterDevice => "register device",
            Self::Authorize => "authorize",
            Self::ExtractToken => "extract bearer token",
        };
        f.write_str(name)
    }
}

/// Create (first run) or load (returning run) the device identity.
pub fn resolve_identity<S: IdentityStorePort + ?Sized>(
    store: &S,
    mode: &LoginMode,
) -> Result<DeviceIdentity, LoginError> {
    match mode {
        LoginMode::FirstRun { .. } => {
            let identity = store.create().map_err(LoginError::IdentityStore)?;
            tracing::info!("Created new device identity");
            Ok(identity)
        }
        LoginMode::Returning => store.load().map_err(|e| match e {
            IdentityStoreError::NotFound { path } => {
                LoginError::IdentityNotFound(path.display().to_string())
            }
            other => LoginError::IdentityStore(other),
        }),
    }
}

/// The authentication sequencer.
#[derive(Debug)]
pub struct LoginUseCase<G, T> {
    gateway: G,
    two_factor: T,
}

impl<G, T> LoginUseCase<G, T>
where
    G: AuthGatewayPort,
    T: TwoFactorPort,
{
    /// Create a new login use case.
    pub const fn new(gateway: G, two_factor: T) -> Self {
        Self {
            gateway,
            two_factor,
        }
    }

    /// Give back the gateway (and with it the logged-in session).
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// Run the full login and return the bearer token.
    #[tracing::instrument(skip_all, fields(first_run = mode.is_first_run()))]
    pub async fn execute(
        &mut self,
        credentials: &Credentials,
        identity: &DeviceIdentity,
        mode: &LoginMode,
    ) -> Result<BearerToken, LoginError> {
        tracing::info!("Starting login procedure");

        let state = self.fetch_correlation_state().await?;
        let form = self.init_auth().await?;
        let form = self
            .submit_identity_claim(form, credentials, identity)
            .await?;
        let response = self.submit_credentials(form, credentials).await?;

        let token_id = match mode {
            LoginMode::FirstRun { device_name } => {
                self.two_factor_and_register(response, device_name).await?
            }
            LoginMode::Returning => token_id_of(&response)
                .map(str::to_string)
                .map_err(LoginError::shape(LoginStage::SubmitCredentials))?,
        };

        let token = self.authorize_and_extract(&token_id, &state).await?;
        tracing::info!("Login successful");
        Ok(token)
    }

    async fn fetch_correlation_state(&mut self) -> Result<OAuthState, LoginError> {
        let stage = LoginStage::FetchLoginPage;
        let page = self
            .gateway
            .fetch_login_page()
            .await
            .map_err(LoginError::at(stage))?;
        let correlation_id = extract_between(&page, CORRELATION_ID_MARKER, "\"")
            .map_err(LoginError::shape(stage))?;
        tracing::debug!(correlation_id, "Found correlation id");
        Ok(OAuthState::new(correlation_id))
    }

    async fn init_auth(&mut self) -> Result<CallbackForm, LoginError> {
        let stage = LoginStage::InitAuth;
        let document = self
            .gateway
            .start_authentication()
            .await
            .map_err(LoginError::at(stage))?;
        CallbackForm::parse(document).map_err(LoginError::shape(stage))
    }

    async fn submit_identity_claim(
        &mut self,
        form: CallbackForm,
        credentials: &Credentials,
        identity: &DeviceIdentity,
    ) -> Result<CallbackForm, LoginError> {
        let stage = LoginStage::SubmitIdentityClaim;
        let form = form
            .with_slot(0, credentials.username())
            .and_then(|f| f.with_slot(1, REDIRECT_URL))
            .and_then(|f| f.with_slot(2, APPLICATION_NAME))
            .and_then(|f| f.with_slot(3, identity.to_callback_value()))
            .map_err(LoginError::shape(stage))?;
        let document = self.submit(stage, &form).await?;
        CallbackForm::parse(document).map_err(LoginError::shape(stage))
    }

    async fn submit_credentials(
        &mut self,
        form: CallbackForm,
        credentials: &Credentials,
    ) -> Result<Value, LoginError> {
        let stage = LoginStage::SubmitCredentials;
        let form = form
            .with_slot(1, credentials.username())
            .and_then(|f| f.with_slot(2, credentials.password()))
            .map_err(LoginError::shape(stage))?;
        let document = match self.gateway.submit_callbacks(&form).await {
            Err(GatewayError::UnexpectedStatus { status: 401, .. }) => {
                tracing::warn!("Provider answered credentials with 401");
                return Err(LoginError::Authentication);
            }
            other => other.map_err(LoginError::at(stage))?,
        };
        if is_credentials_retry(&document) {
            tracing::warn!("Provider rejected username/password");
            return Err(LoginError::Authentication);
        }
        Ok(document)
    }

    async fn two_factor_and_register(
        &mut self,
        response: Value,
        device_name: &str,
    ) -> Result<String, LoginError> {
        tracing::info!("First run: a two factor code is required");
        let stage = LoginStage::SubmitTwoFactor;
        let code = self.two_factor.request_code()?;
        let form = CallbackForm::parse(response)
            .and_then(|f| f.with_slot(0, code.as_str()))
            .map_err(LoginError::shape(stage))?;
        let document = self.submit(stage, &form).await?;

        let stage = LoginStage::RegisterDevice;
        let form = CallbackForm::parse(document)
            .and_then(|f| f.with_slot(0, device_name))
            .map_err(LoginError::shape(stage))?;
        let document = self.submit(stage, &form).await?;
        tracing::info!(device_name, "Device registered");

        token_id_of(&document)
            .map(str::to_string)
            .map_err(LoginError::shape(stage))
    }

    async fn authorize_and_extract(
        &mut self,
        token_id: &str,
        state: &OAuthState,
    ) -> Result<BearerToken, LoginError> {
        let stage = LoginStage::Authorize;
        let document = self
            .gateway
            .authorize(token_id, state)
            .await
            .map_err(LoginError::at(stage))?;
        let code = document
            .get("code")
            .and_then(Value::as_str)
            .ok_or_else(|| ProtocolShapeError::field("code"))
            .map_err(LoginError::shape(stage))?;

        let stage = LoginStage::ExtractToken;
        let page = self
            .gateway
            .fetch_app_bootstrap(code, state)
            .await
            .map_err(LoginError::at(stage))?;
        let token = extract_between(&page, ID_TOKEN_MARKER, "\"").map_err(LoginError::shape(stage))?;
        if token.is_empty() {
            return Err(LoginError::shape(stage)(ProtocolShapeError::field("idToken")));
        }
        Ok(BearerToken::new(token))
    }

    async fn submit(&mut self, stage: LoginStage, form: &CallbackForm) -> Result<Value, LoginError> {
        tracing::debug!(%stage, callbacks = form.len(), "Submitting callback form");
        self.gateway
            .submit_callbacks(form)
            .await
            .map_err(LoginError::at(stage))
    }
}
