//! End-to-end tests against a mock provider
//!
//! Runs the real session, gateway and data client against wiremock: login
//! (returning and first run), the failure paths that must stop the flow, and
//! the data API round trip.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use saxo_extract::application::use_cases::LoginError;
use saxo_extract::infrastructure::saxo::USER_AGENT;
use saxo_extract::{
    AppError, Credentials, DatasetOutcome, DateRange, LoginMode, OAuthState, RunConfig,
    SaxoConfig, SaxoEndpoints, TwoFactorCode, TwoFactorError, TwoFactorPort,
};

const AUTHENTICATE: &str = "/am/json/realms/root/realms/dca/authenticate";
const AUTHORIZE: &str = "/am/oauth2/realms/root/realms/dca/authorize";
const CORRELATION_ID: &str = "corr-42";
const STORED_IDENTIFIER: &str = "1111111111-2222222222-3333333333";
const BEARER: &str = "bearer-xyz";

// =============================================================================
// Matchers
// =============================================================================

/// Matches an authenticate POST echoing the given `authId`.
struct AuthId(&'static str);

impl Match for AuthId {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|v| v.get("authId").and_then(Value::as_str).map(|id| id == self.0))
            .unwrap_or(false)
    }
}

/// Matches a request without a body.
struct EmptyBody;

impl Match for EmptyBody {
    fn matches(&self, request: &Request) -> bool {
        request.body.is_empty()
    }
}

/// Matches when `callbacks[index].input[0].value` equals `expected`.
struct Slot(usize, String);

impl Match for Slot {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|v| {
                v.pointer(&format!("/callbacks/{}/input/0/value", self.0))
                    .and_then(Value::as_str)
                    .map(|s| s == self.1)
            })
            .unwrap_or(false)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn form(auth_id: &str, slots: usize) -> Value {
    let callbacks: Vec<Value> = (0..slots)
        .map(|i| {
            json!({
                "type": "NameCallback",
                "output": [{ "name": "prompt", "value": format!("field {i}") }],
                "input": [{ "name": format!("IDToken{}", i + 1), "value": "" }]
            })
        })
        .collect();
    json!({ "authId": auth_id, "header": "Sign in", "callbacks": callbacks })
}

fn login_page() -> String {
    format!(
        r#"<html><head><script>window.cfg = {{"locale":"da","correlationId":"{CORRELATION_ID}","env":"live"}};</script></head></html>"#
    )
}

fn bootstrap_page() -> String {
    format!(r#"<html><script>boot({{"user":"alice","idToken":"{BEARER}","expiresIn":1200}})</script></html>"#)
}

struct Provider {
    server: MockServer,
}

impl Provider {
    async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    fn endpoints(&self) -> SaxoEndpoints {
        SaxoEndpoints::new(self.server.uri(), self.server.uri())
    }

    async fn mount_login_page(&self) {
        Mock::given(method("GET"))
            .and(path("/Login/da"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "SSO=abc; Path=/")
                    .set_body_string(login_page()),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mount_identity_steps(&self, identity_json: Option<String>) {
        Mock::given(method("POST"))
            .and(path(AUTHENTICATE))
            .and(query_param("authIndexType", "service"))
            .and(query_param("authIndexValue", "authn-web-v6"))
            .and(EmptyBody)
            .respond_with(ResponseTemplate::new(200).set_body_json(form("a1", 4)))
            .expect(1)
            .mount(&self.server)
            .await;

        let claim = Mock::given(method("POST"))
            .and(path(AUTHENTICATE))
            .and(AuthId("a1"))
            .and(Slot(0, "alice".to_string()))
            .and(Slot(1, "https://www.saxoinvestor.dk/investor".to_string()))
            .and(Slot(2, "SaxoInvestor".to_string()));
        let claim = match identity_json {
            Some(identity) => claim.and(Slot(3, identity)),
            None => claim,
        };
        claim
            .respond_with(ResponseTemplate::new(200).set_body_json(form("a2", 3)))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mount_credentials(&self, response: Value) {
        Mock::given(method("POST"))
            .and(path(AUTHENTICATE))
            .and(AuthId("a2"))
            .and(Slot(1, "alice".to_string()))
            .and(Slot(2, "secret".to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mount_authorize(&self, token_id: &str, expected: u64) {
        let state = OAuthState::new(CORRELATION_ID);
        Mock::given(method("POST"))
            .and(path(AUTHORIZE))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(header("cookie", "SSO=abc"))
            .and(body_string_contains(format!("csrf={token_id}&")))
            .and(body_string_contains("decision=allow"))
            .and(body_string_contains(format!("state={}", state.encoded())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "code-1" })))
            .expect(expected)
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/showapp"))
            .and(query_param("code", "code-1"))
            .and(query_param("state", state.encoded()))
            .respond_with(ResponseTemplate::new(200).set_body_string(bootstrap_page()))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    async fn mount_data_api(&self, accounts: &[&str]) {
        let bearer = format!("Bearer {BEARER}");

        Mock::given(method("GET"))
            .and(path("/openapi/port/v1/clients/me"))
            .and(header("authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ClientKey": "ck-1" })))
            .expect(1)
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/openapi/hist/v1/transactions"))
            .and(header("authorization", bearer.as_str()))
            .and(query_param("ClientKey", "ck-1"))
            .and(query_param("FromDate", "2024-01-01"))
            .and(query_param("ToDate", "2024-01-31"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "Data": [{ "TransactionId": "t-1" }] })),
            )
            .expect(1)
            .mount(&self.server)
            .await;

        let data: Vec<Value> = accounts
            .iter()
            .map(|key| json!({ "AccountKey": key, "Currency": "DKK" }))
            .collect();
        Mock::given(method("POST"))
            .and(path("/openapi/port/v1/accounts/subscriptions"))
            .and(header("authorization", bearer.as_str()))
            .and(body_partial_json(json!({
                "Arguments": { "ClientKey": "ck-1" },
                "ReferenceId": "1"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "Snapshot": { "Data": data } })),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn mount_positions(&self, account_key: &str, reference_id: &str, status: u16) {
        let body = if status == 201 {
            json!({ "Snapshot": { "Data": [{ "NetPositionId": format!("np-{account_key}") }] } })
        } else {
            json!({ "ErrorCode": "InvalidRequest", "Message": "account not available" })
        };
        Mock::given(method("POST"))
            .and(path("/openapi/port/v1/netpositions/subscriptions"))
            .and(body_partial_json(json!({
                "Arguments": { "ClientKey": "ck-1", "AccountKey": account_key },
                "ReferenceId": reference_id
            })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap()
    }
}

/// Two-factor source returning a fixed code.
struct ScriptedCode {
    code: &'static str,
    calls: Arc<AtomicUsize>,
}

impl TwoFactorPort for ScriptedCode {
    fn request_code(&mut self) -> Result<TwoFactorCode, TwoFactorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        TwoFactorCode::parse(self.code).map_err(|e| TwoFactorError::Invalid(e.to_string()))
    }
}

/// Two-factor source for returning runs, which must never ask.
struct NeverAsked;

impl TwoFactorPort for NeverAsked {
    fn request_code(&mut self) -> Result<TwoFactorCode, TwoFactorError> {
        panic!("two factor requested on a returning run");
    }
}

fn run_config(endpoints: SaxoEndpoints, identity_file: &Path, mode: LoginMode) -> RunConfig {
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    RunConfig {
        credentials: Credentials::new("alice", "secret"),
        mode,
        range: DateRange::validate("2024-01-01", "2024-01-31", today).unwrap(),
        identity_file: identity_file.to_path_buf(),
        saxo: SaxoConfig::new(endpoints).with_timeout(Duration::from_secs(5)),
        print_json: false,
    }
}

fn stored_identity(dir: &TempDir) -> std::path::PathBuf {
    let file = dir.path().join("identity.json");
    std::fs::write(
        &file,
        json!({ "identifier": STORED_IDENTIFIER, "metadata": "" }).to_string(),
    )
    .unwrap();
    file
}

fn stored_identity_json() -> String {
    json!({ "identifier": STORED_IDENTIFIER, "metadata": "" }).to_string()
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_returning_run_fetches_all_datasets() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(Some(stored_identity_json())).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning", "successUrl": "/am/console" }))
        .await;
    provider.mount_authorize("tok-returning", 1).await;
    provider.mount_data_api(&["acc-1", "acc-2"]).await;
    provider.mount_positions("acc-1", "2", 201).await;
    provider.mount_positions("acc-2", "3", 201).await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let report = saxo_extract::run(&config, NeverAsked).await.unwrap();

    assert_eq!(report.client_key, "ck-1");
    assert!(report.transactions.is_fetched());
    assert!(report.accounts.is_fetched());
    let positions = report.positions.data().unwrap();
    assert!(positions.is_complete());
    assert_eq!(positions.accounts.len(), 2);
    assert_eq!(positions.accounts[1].account_key, "acc-2");

    // Identity untouched by a returning run.
    let stored: Value = serde_json::from_slice(&std::fs::read(&identity_file).unwrap()).unwrap();
    assert_eq!(stored["identifier"], STORED_IDENTIFIER);
}

#[tokio::test]
async fn test_first_run_registers_device_and_persists_identity() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = dir.path().join("identity.json");

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider.mount_credentials(form("a3", 1)).await;

    // Two-factor code goes into the first slot of the challenge form.
    Mock::given(method("POST"))
        .and(path(AUTHENTICATE))
        .and(AuthId("a3"))
        .and(Slot(0, "123456".to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(form("a4", 1)))
        .expect(1)
        .mount(&provider.server)
        .await;

    // Device name goes into the first slot of the registration form.
    Mock::given(method("POST"))
        .and(path(AUTHENTICATE))
        .and(AuthId("a4"))
        .and(Slot(0, "Laptop".to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tokenId": "tok-first" })))
        .expect(1)
        .mount(&provider.server)
        .await;

    provider.mount_authorize("tok-first", 1).await;
    provider.mount_data_api(&[]).await;

    let calls = Arc::new(AtomicUsize::new(0));
    let prompt = ScriptedCode {
        code: "123456",
        calls: Arc::clone(&calls),
    };
    let mode = LoginMode::FirstRun {
        device_name: "Laptop".to_string(),
    };
    let config = run_config(provider.endpoints(), &identity_file, mode);
    let report = saxo_extract::run(&config, prompt).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.client_key, "ck-1");

    // The persisted identity is the one submitted in the device slot.
    let stored: Value = serde_json::from_slice(&std::fs::read(&identity_file).unwrap()).unwrap();
    let identifier = stored["identifier"].as_str().unwrap();
    assert_eq!(identifier.len(), 32);
    let claim = provider
        .requests()
        .await
        .into_iter()
        .find(|r| AuthId("a1").matches(r))
        .unwrap();
    let claim: Value = serde_json::from_slice(&claim.body).unwrap();
    let submitted: Value =
        serde_json::from_str(claim["callbacks"][3]["input"][0]["value"].as_str().unwrap()).unwrap();
    assert_eq!(submitted["identifier"], identifier);
}

#[tokio::test]
async fn test_rejected_credentials_stop_before_authorize() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(Some(stored_identity_json())).await;
    let mut retry = form("a2-retry", 3);
    retry["stage"] = json!("retryCredentialsPage");
    provider.mount_credentials(retry).await;
    provider.mount_authorize("tok-any", 0).await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let err = saxo_extract::run(&config, NeverAsked).await.unwrap_err();

    assert!(matches!(err, AppError::Login(LoginError::Authentication)));
    assert_eq!(provider.requests().await.len(), 4);
}

#[tokio::test]
async fn test_missing_correlation_id_sends_no_post() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    Mock::given(method("GET"))
        .and(path("/Login/da"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&provider.server)
        .await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let err = saxo_extract::run(&config, NeverAsked).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Login(LoginError::ProtocolShape { .. })
    ));
    let requests = provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests.iter().all(|r| r.method.as_str() == "GET"));
}

#[tokio::test]
async fn test_missing_token_on_bootstrap_page_fails() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning" }))
        .await;
    Mock::given(method("POST"))
        .and(path(AUTHORIZE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "code-1" })))
        .mount(&provider.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/showapp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no token</html>"))
        .mount(&provider.server)
        .await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let err = saxo_extract::run(&config, NeverAsked).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Login(LoginError::ProtocolShape { .. })
    ));
    assert!(
        !provider
            .requests()
            .await
            .iter()
            .any(|r| r.url.path().starts_with("/openapi"))
    );
}

#[tokio::test]
async fn test_form_content_type_does_not_leak_past_authorize() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning" }))
        .await;
    provider.mount_authorize("tok-returning", 1).await;
    provider.mount_data_api(&[]).await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    saxo_extract::run(&config, NeverAsked).await.unwrap();

    let requests = provider.requests().await;
    let bootstrap = requests
        .iter()
        .find(|r| r.url.path() == "/showapp")
        .unwrap();
    assert!(bootstrap.headers.get("content-type").is_none());
    assert!(
        requests
            .iter()
            .all(|r| r.headers.get("user-agent").is_some_and(|v| v == USER_AGENT))
    );
}

// =============================================================================
// Data API
// =============================================================================

#[tokio::test]
async fn test_empty_account_list_skips_positions() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning" }))
        .await;
    provider.mount_authorize("tok-returning", 1).await;
    provider.mount_data_api(&[]).await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let report = saxo_extract::run(&config, NeverAsked).await.unwrap();

    let positions = report.positions.data().unwrap();
    assert!(positions.accounts.is_empty());
    assert!(positions.is_complete());
    assert!(
        !provider
            .requests()
            .await
            .iter()
            .any(|r| r.url.path().contains("netpositions"))
    );
}

#[tokio::test]
async fn test_position_failure_stops_loop_and_keeps_partial_results() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning" }))
        .await;
    provider.mount_authorize("tok-returning", 1).await;
    provider.mount_data_api(&["acc-1", "acc-2", "acc-3"]).await;
    provider.mount_positions("acc-1", "2", 201).await;
    provider.mount_positions("acc-2", "3", 400).await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let report = saxo_extract::run(&config, NeverAsked).await.unwrap();

    let positions = report.positions.data().unwrap();
    assert_eq!(positions.accounts.len(), 1);
    assert_eq!(positions.failed_account.as_deref(), Some("acc-2"));
    assert!(
        positions
            .failure
            .as_deref()
            .unwrap()
            .contains("account not available")
    );
    let position_calls = provider
        .requests()
        .await
        .iter()
        .filter(|r| r.url.path().contains("netpositions"))
        .count();
    assert_eq!(position_calls, 2);
}

#[tokio::test]
async fn test_missing_client_key_is_fatal() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning" }))
        .await;
    provider.mount_authorize("tok-returning", 1).await;
    Mock::given(method("GET"))
        .and(path("/openapi/port/v1/clients/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&provider.server)
        .await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let err = saxo_extract::run(&config, NeverAsked).await.unwrap_err();

    assert!(matches!(err, AppError::Extract(_)));
    assert!(
        !provider
            .requests()
            .await
            .iter()
            .any(|r| r.url.path().contains("transactions"))
    );
}

#[tokio::test]
async fn test_transactions_failure_is_reported_and_run_continues() {
    let provider = Provider::start().await;
    let dir = TempDir::new().unwrap();
    let identity_file = stored_identity(&dir);

    provider.mount_login_page().await;
    provider.mount_identity_steps(None).await;
    provider
        .mount_credentials(json!({ "tokenId": "tok-returning" }))
        .await;
    provider.mount_authorize("tok-returning", 1).await;

    Mock::given(method("GET"))
        .and(path("/openapi/port/v1/clients/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ClientKey": "ck-1" })))
        .mount(&provider.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/openapi/hist/v1/transactions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&provider.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/openapi/port/v1/accounts/subscriptions"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "Snapshot": { "Data": [] } })),
        )
        .expect(1)
        .mount(&provider.server)
        .await;

    let config = run_config(provider.endpoints(), &identity_file, LoginMode::Returning);
    let report = saxo_extract::run(&config, NeverAsked).await.unwrap();

    assert!(matches!(
        report.transactions,
        DatasetOutcome::Failed { ref reason } if reason.contains("503")
    ));
    assert!(report.accounts.is_fetched());
}
