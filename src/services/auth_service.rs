// ============================================================================
// AUTH SERVICE - login / logout / verify
// ============================================================================

use crate::models::{LoginRequest, LoginResponse, Session};
use crate::services::api_client::{ApiCall, ApiClient, ApiError};
use crate::services::transport::Method;
use crate::state::SessionContext;

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    context: SessionContext,
}

impl AuthService {
    pub fn new(api: ApiClient, context: SessionContext) -> Self {
        Self { api, context }
    }

    /// Authenticates and publishes the new session. Nothing is stored when
    /// the server rejects the credentials.
    pub async fn login(&self, email: &str, senha: &str) -> Result<Session, ApiError> {
        log::info!("🔐 Login attempt for {}", email);
        let body = LoginRequest {
            email: email.trim().to_string(),
            senha: senha.to_string(),
        };
        let call = ApiCall::new(Method::Post, "/auth/login").json(&body)?.anonymous();
        let response: LoginResponse = self.api.execute(call).await?;
        let session = Session::from(response);

        if let Err(e) = self.context.sign_in(session.clone()) {
            // Keep the user signed in for this page even if storage refused the write
            log::error!("❌ Could not persist session: {}", e);
            self.context.set_session(Some(session.clone()));
        }
        log::info!("✅ Logged in as {} ({})", session.user.name, session.role().as_str());
        Ok(session)
    }

    /// Tells the server (best effort), then clears the session and reloads on login.
    /// A 401 here has already cleared storage and sent the user to the expired login.
    pub async fn logout(&self) {
        match self.api.post_empty::<serde_json::Value>("/auth/logout").await {
            Ok(_) => {}
            Err(ApiError::AuthExpired) => {
                self.context.reset();
                return;
            }
            Err(e) => log::warn!("⚠️ Server logout failed, clearing locally anyway: {}", e),
        }
        self.context.logout();
    }

    /// `Ok(false)` when the server no longer accepts the token.
    pub async fn verify(&self) -> Result<bool, ApiError> {
        match self.api.get::<serde_json::Value>("/auth/verify", &[]).await {
            Ok(_) => Ok(true),
            Err(ApiError::AuthExpired) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{MemoryNavigator, NavigationEvent};
    use crate::services::mock_transport::{MockFailure, MockTransport};
    use crate::state::LoadingState;
    use crate::stores::SessionStore;
    use crate::utils::MemoryStorage;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn service() -> (MemoryStorage, MemoryNavigator, MockTransport, AuthService) {
        let storage = MemoryStorage::new();
        let navigator = MemoryNavigator::new("/login");
        let transport = MockTransport::new();
        let store = SessionStore::new(Rc::new(storage.clone()));
        let api = ApiClient::new(
            "http://localhost:3000/api",
            10_000,
            Rc::new(transport.clone()),
            store.clone(),
            Rc::new(navigator.clone()),
            LoadingState::new(),
        );
        let context = SessionContext::new(store, Rc::new(navigator.clone()));
        (storage, navigator, transport, AuthService::new(api, context))
    }

    #[test]
    fn login_stores_token_and_profile() {
        let (storage, _, _, auth) = service();
        let session = block_on(auth.login("teste@vidaplus.com", "123456")).unwrap();

        assert_eq!(session.token, "mock-jwt-token");
        assert_eq!(session.user.name, "Administrador");
        assert!(storage.contains_key("token"));
        assert!(storage.contains_key("user"));
        assert!(auth.context.is_authenticated());
    }

    #[test]
    fn bad_credentials_store_nothing_and_stay_put() {
        let (storage, navigator, _, auth) = service();
        let result = block_on(auth.login("teste@vidaplus.com", "000000"));

        assert_eq!(result, Err(ApiError::AuthExpired));
        assert!(storage.is_empty());
        assert!(navigator.history().is_empty());
        assert!(!auth.context.is_authenticated());
    }

    #[test]
    fn logout_survives_a_failing_server() {
        let (storage, navigator, transport, auth) = service();
        block_on(auth.login("teste@vidaplus.com", "123456")).unwrap();
        transport.fail_next(MockFailure::Network);

        block_on(auth.logout());

        assert!(storage.is_empty());
        assert_eq!(navigator.last(), Some(NavigationEvent::Hard("/login".into())));
    }

    #[test]
    fn expired_token_on_logout_keeps_the_expired_redirect() {
        let (storage, navigator, transport, auth) = service();
        block_on(auth.login("teste@vidaplus.com", "123456")).unwrap();
        transport.fail_next(MockFailure::Status(401, String::new()));

        block_on(auth.logout());

        assert!(storage.is_empty());
        assert!(!auth.context.is_authenticated());
        assert_eq!(
            navigator.history(),
            vec![NavigationEvent::Hard("/login?expired=true".into())]
        );
        let sent = transport.last_request().unwrap();
        assert_eq!(sent.header("Authorization"), Some("Bearer mock-jwt-token"));
    }

    #[test]
    fn verify_reports_a_rejected_token_as_false() {
        let (storage, _, transport, auth) = service();
        block_on(auth.login("teste@vidaplus.com", "123456")).unwrap();
        assert_eq!(block_on(auth.verify()), Ok(true));

        transport.fail_next(MockFailure::Status(401, String::new()));
        assert_eq!(block_on(auth.verify()), Ok(false));
        assert!(storage.is_empty());
    }
}
