// ============================================================================
// API CLIENT - Authenticated JSON requests + central error classification
// ============================================================================
// Every call: bearer token from the session store, global loading counter,
// one place that decides what a failure means. A 401 ends the session here;
// every other failure is logged and handed back to the screen.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::{login_location, Navigator};
use crate::services::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use crate::state::LoadingState;
use crate::stores::SessionStore;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// 401: token missing, invalid or expired
    #[error("Session expired")]
    AuthExpired,
    /// 403: signed in but not allowed
    #[error("Access denied: {message}")]
    Forbidden { message: String },
    /// Any other non-2xx answer
    #[error("{message}")]
    ServerError { status: u16, message: String },
    /// Request sent, no response
    #[error("Connection error: check your internet connection")]
    NetworkUnavailable(String),
    /// Failed before anything was sent
    #[error("Configuration error: {0}")]
    RequestMisconfigured(String),
    /// 2xx with a body that does not match the expected shape
    #[error("Unexpected response: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthExpired => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Network(reason) => ApiError::NetworkUnavailable(reason),
            TransportError::Timeout(ms) => {
                ApiError::NetworkUnavailable(format!("no response after {} ms", ms))
            }
            TransportError::InvalidRequest(reason) => ApiError::RequestMisconfigured(reason),
        }
    }
}

/// Error body shape used by the backend
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// One outgoing call, before the client decorates it.
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Skip the session-expiry side effects on 401 (used by login).
    pub anonymous: bool,
}

impl ApiCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            anonymous: false,
        }
    }

    pub fn query(mut self, pairs: &[(&str, String)]) -> Self {
        self.query
            .extend(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::RequestMisconfigured(format!("body serialization: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    timeout_ms: u32,
    transport: Rc<dyn Transport>,
    store: SessionStore,
    navigator: Rc<dyn Navigator>,
    loading: LoadingState,
    on_session_expired: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout_ms: u32,
        transport: Rc<dyn Transport>,
        store: SessionStore,
        navigator: Rc<dyn Navigator>,
        loading: LoadingState,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
            transport,
            store,
            navigator,
            loading,
            on_session_expired: Rc::new(RefCell::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn loading(&self) -> &LoadingState {
        &self.loading
    }

    /// Extra hook run when a 401 ends the session (e.g. reset the context).
    pub fn set_on_session_expired<F: Fn() + 'static>(&self, callback: F) {
        *self.on_session_expired.borrow_mut() = Some(Rc::new(callback));
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.execute(ApiCall::new(Method::Get, path).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiCall::new(Method::Post, path).json(body)?).await
    }

    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiCall::new(Method::Post, path)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiCall::new(Method::Put, path).json(body)?).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiCall::new(Method::Patch, path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute::<serde_json::Value>(ApiCall::new(Method::Delete, path))
            .await
            .map(|_| ())
    }

    /// Sends `call` and decodes a successful body into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, ApiError> {
        let method = call.method;
        let path = call.path.clone();
        let anonymous = call.anonymous;

        let request = match self.build_request(call) {
            Ok(request) => request,
            Err(e) => {
                log::error!("❌ {} {}: {}", method, path, e);
                return Err(e);
            }
        };

        log::debug!("🌐 {} {}", method, request.url);
        let response = {
            let _in_flight = self.loading.begin();
            self.transport.send(request).await
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::from(e);
                match &error {
                    ApiError::RequestMisconfigured(reason) => {
                        log::error!("❌ {} {}: configuration error: {}", method, path, reason)
                    }
                    _ => log::error!(
                        "❌ {} {}: connection error, check your internet connection ({})",
                        method,
                        path,
                        error
                    ),
                }
                return Err(error);
            }
        };

        if response.is_success() {
            return decode_body(&response.body).map_err(|e| {
                log::error!("❌ {} {}: {}", method, path, e);
                e
            });
        }

        Err(self.classify_failure(method, &path, anonymous, response))
    }

    fn build_request(&self, call: ApiCall) -> Result<HttpRequest, ApiError> {
        let mut url = url::Url::parse(&format!("{}{}", self.base_url, call.path)).map_err(|e| {
            ApiError::RequestMisconfigured(format!("invalid URL '{}{}': {}", self.base_url, call.path, e))
        })?;
        if !call.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &call.query {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(token) = self.store.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        let body = call.body.map(|value| value.to_string());
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: call.method,
            url: url.into(),
            headers,
            body,
            timeout_ms: self.timeout_ms,
        })
    }

    fn classify_failure(
        &self,
        method: Method,
        path: &str,
        anonymous: bool,
        response: HttpResponse,
    ) -> ApiError {
        let body: ApiErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
        let server_message = body.message.filter(|m| !m.trim().is_empty());

        match response.status {
            401 => {
                if anonymous {
                    log::warn!("⚠️ {} {}: credentials rejected", method, path);
                } else {
                    log::warn!("⚠️ {} {}: session expired or invalid", method, path);
                    self.expire_session();
                }
                ApiError::AuthExpired
            }
            403 => {
                log::error!("❌ {} {}: access to this resource is not allowed", method, path);
                ApiError::Forbidden {
                    message: server_message.unwrap_or_else(|| "Access denied".to_string()),
                }
            }
            status => {
                let message = server_message
                    .unwrap_or_else(|| format!("Error {}: operation failed", status));
                log::error!("❌ {} {}: {}", method, path, message);
                ApiError::ServerError { status, message }
            }
        }
    }

    fn expire_session(&self) {
        self.store.clear();
        let hook = self.on_session_expired.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        self.navigator.hard_redirect(&login_location(None, true));
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Session, User};
    use crate::routing::{MemoryNavigator, NavigationEvent};
    use crate::services::mock_transport::{MockFailure, MockTransport};
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;
    use std::cell::Cell;

    struct Fixture {
        storage: MemoryStorage,
        navigator: MemoryNavigator,
        transport: MockTransport,
        client: ApiClient,
    }

    fn fixture() -> Fixture {
        let storage = MemoryStorage::new();
        let navigator = MemoryNavigator::new("/pacientes");
        let transport = MockTransport::new();
        let client = ApiClient::new(
            "http://localhost:3000/api/",
            10_000,
            Rc::new(transport.clone()),
            SessionStore::new(Rc::new(storage.clone())),
            Rc::new(navigator.clone()),
            LoadingState::new(),
        );
        Fixture {
            storage,
            navigator,
            transport,
            client,
        }
    }

    fn sign_in(f: &Fixture) {
        let session = Session::new(
            User {
                id: 1,
                name: "Administrador".into(),
                email: "teste@vidaplus.com".into(),
                role: Role::Admin,
            },
            "mock-jwt-token",
        );
        SessionStore::new(Rc::new(f.storage.clone())).save(&session).unwrap();
    }

    #[test]
    fn attaches_bearer_token_and_query() {
        let f = fixture();
        sign_in(&f);

        let _: serde_json::Value = block_on(
            f.client
                .get("/consultas", &[("status", "agendada".to_string())]),
        )
        .unwrap();

        let request = f.transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:3000/api/consultas?status=agendada");
        assert_eq!(request.header("authorization"), Some("Bearer mock-jwt-token"));
        assert_eq!(request.timeout_ms, 10_000);
        assert!(!f.client.loading().is_loading());
    }

    #[test]
    fn anonymous_requests_carry_no_token() {
        let f = fixture();
        let result: Result<serde_json::Value, _> = block_on(f.client.get("/pacientes", &[]));
        assert_eq!(result, Err(ApiError::AuthExpired));
        assert_eq!(f.transport.last_request().unwrap().header("Authorization"), None);
    }

    #[test]
    fn unauthorized_clears_storage_and_reloads_login_from_any_endpoint() {
        for path in ["/pacientes", "/dashboard/indicadores", "/telemedicina/sessao/9/token"] {
            let f = fixture();
            sign_in(&f);
            let expired_hook = Rc::new(Cell::new(false));
            let flag = expired_hook.clone();
            f.client.set_on_session_expired(move || flag.set(true));
            f.transport.fail_next(MockFailure::Status(401, String::new()));

            let result: Result<serde_json::Value, _> = block_on(f.client.get(path, &[]));

            assert_eq!(result, Err(ApiError::AuthExpired), "{}", path);
            assert!(f.storage.is_empty(), "{}", path);
            assert!(expired_hook.get());
            match f.navigator.last() {
                Some(NavigationEvent::Hard(location)) => {
                    assert!(location.starts_with("/login"));
                    assert!(location.contains("expired=true"));
                }
                other => panic!("expected a hard redirect, got {:?}", other),
            }
        }
    }

    #[test]
    fn forbidden_is_reported_without_touching_the_session() {
        let f = fixture();
        sign_in(&f);
        f.transport.fail_next(MockFailure::Status(403, String::new()));

        let result: Result<serde_json::Value, _> = block_on(f.client.get("/pacientes", &[]));

        assert!(matches!(result, Err(ApiError::Forbidden { .. })));
        assert!(f.storage.contains_key("token"));
        assert!(f.navigator.history().is_empty());
    }

    #[test]
    fn server_errors_prefer_the_server_message() {
        let f = fixture();
        sign_in(&f);
        f.transport.fail_next(MockFailure::Status(
            422,
            r#"{"message":"CPF já cadastrado","code":"CPF_DUPLICADO"}"#.into(),
        ));
        let result: Result<serde_json::Value, _> = block_on(f.client.get("/pacientes", &[]));
        assert_eq!(
            result,
            Err(ApiError::ServerError {
                status: 422,
                message: "CPF já cadastrado".into()
            })
        );

        f.transport.fail_next(MockFailure::Status(500, "<html>oops</html>".into()));
        let result: Result<serde_json::Value, _> = block_on(f.client.get("/pacientes", &[]));
        let error = result.unwrap_err();
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.to_string(), "Error 500: operation failed");
    }

    #[test]
    fn network_and_configuration_failures_are_distinct() {
        let f = fixture();
        sign_in(&f);

        f.transport.fail_next(MockFailure::Network);
        let result: Result<serde_json::Value, _> = block_on(f.client.get("/pacientes", &[]));
        assert!(matches!(result, Err(ApiError::NetworkUnavailable(_))));

        f.transport.fail_next(MockFailure::Timeout);
        let result: Result<serde_json::Value, _> = block_on(f.client.get("/pacientes", &[]));
        assert!(matches!(result, Err(ApiError::NetworkUnavailable(_))));

        let broken = ApiClient::new(
            "not a url",
            10_000,
            Rc::new(f.transport.clone()),
            SessionStore::new(Rc::new(f.storage.clone())),
            Rc::new(f.navigator.clone()),
            LoadingState::new(),
        );
        let requests_before = f.transport.requests().len();
        let result: Result<serde_json::Value, _> = block_on(broken.get("/pacientes", &[]));
        assert!(matches!(result, Err(ApiError::RequestMisconfigured(_))));
        assert_eq!(f.transport.requests().len(), requests_before);
        assert!(!broken.loading().is_loading());
    }

    #[test]
    fn unexpected_success_body_is_an_invalid_payload() {
        let f = fixture();
        sign_in(&f);
        let result: Result<Vec<u64>, _> = block_on(f.client.get("/dashboard/estatisticas", &[]));
        assert!(matches!(result, Err(ApiError::InvalidPayload(_))));
    }

    #[test]
    fn anonymous_401_leaves_navigation_alone() {
        let f = fixture();
        let call = ApiCall::new(Method::Post, "/auth/login")
            .json(&serde_json::json!({"email": "x@y.com", "senha": "errada"}))
            .unwrap()
            .anonymous();

        let result: Result<serde_json::Value, _> = block_on(f.client.execute(call));

        assert_eq!(result, Err(ApiError::AuthExpired));
        assert!(f.navigator.history().is_empty());
    }
}
