// ============================================================================
// LOGIN VIEWMODEL - Credentials form, expired banner, post-login redirect
// ============================================================================

use thiserror::Error;

use crate::models::Session;
use crate::routing::LoginQuery;
use crate::services::ApiError;
use crate::state::AppState;
use crate::utils::{INVALID_CREDENTIALS_MESSAGE, SESSION_EXPIRED_BANNER};
use crate::viewmodels::{error_message, ValidationErrors};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoginError {
    #[error("login form is incomplete")]
    Validation(ValidationErrors),
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl LoginError {
    /// Text for the alert above the form
    pub fn message(&self) -> String {
        match self {
            LoginError::Validation(errors) => errors
                .iter()
                .next()
                .map(|(_, message)| message.to_string())
                .unwrap_or_default(),
            LoginError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            LoginError::Api(ApiError::NetworkUnavailable(_)) => {
                error_message(&ApiError::NetworkUnavailable(String::new()))
            }
            // Anything else the server says is shown as a credentials problem
            LoginError::Api(_) => INVALID_CREDENTIALS_MESSAGE.to_string(),
        }
    }
}

pub struct LoginViewModel {
    app: AppState,
    query: LoginQuery,
}

impl LoginViewModel {
    pub fn new(app: &AppState) -> Self {
        Self {
            query: LoginQuery::from_location(&app.current_location()),
            app: app.clone(),
        }
    }

    pub fn query(&self) -> &LoginQuery {
        &self.query
    }

    /// Shown when the previous session was ended by a 401.
    pub fn expired_banner(&self) -> Option<&'static str> {
        self.query.expired.then_some(SESSION_EXPIRED_BANNER)
    }

    pub fn redirect_target(&self) -> String {
        self.query.redirect_target()
    }

    /// Sends an already signed-in user straight on. Returns true if it did.
    pub fn redirect_if_authenticated(&self) -> bool {
        if !self.app.session.is_authenticated() {
            return false;
        }
        let target = self.redirect_target();
        log::info!("↪️ Already signed in, going to {}", target);
        self.app.navigate(&target);
        true
    }

    pub fn validate(email: &str, senha: &str) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if email.trim().is_empty() {
            errors.add("email", "Email é obrigatório");
        }
        if senha.is_empty() {
            errors.add("senha", "Senha é obrigatória");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Logs in and navigates to the redirect target.
    pub async fn submit(&self, email: &str, senha: &str) -> Result<Session, LoginError> {
        Self::validate(email, senha).map_err(LoginError::Validation)?;

        let session = self.app.auth.login(email, senha).await.map_err(|e| match e {
            ApiError::AuthExpired => LoginError::InvalidCredentials,
            other => LoginError::Api(other),
        })?;

        let target = self.redirect_target();
        log::info!("↪️ Login complete, going to {}", target);
        self.app.navigate(&target);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::NavigationEvent;
    use crate::services::MockFailure;
    use crate::viewmodels::testing::TestApp;
    use futures::executor::block_on;

    #[test]
    fn returns_to_the_requested_screen() {
        let t = TestApp::at("/login?redirect=%2Fconsultas");
        let vm = LoginViewModel::new(&t.app);

        let session = block_on(vm.submit("teste@vidaplus.com", "123456")).unwrap();

        assert_eq!(session.user.name, "Administrador");
        assert_eq!(t.navigator.last(), Some(NavigationEvent::Soft("/consultas".into())));
    }

    #[test]
    fn unsafe_or_missing_redirects_go_home() {
        for location in ["/login", "/login?redirect=https%3A%2F%2Fevil.com", "/login?redirect=%2F%2Fevil.com"] {
            let t = TestApp::at(location);
            let vm = LoginViewModel::new(&t.app);
            block_on(vm.submit("teste@vidaplus.com", "123456")).unwrap();
            assert_eq!(t.location(), "/", "{}", location);
        }
    }

    #[test]
    fn bad_credentials_show_the_fixed_message() {
        let t = TestApp::at("/login");
        let vm = LoginViewModel::new(&t.app);

        let error = block_on(vm.submit("teste@vidaplus.com", "errada")).unwrap_err();

        assert_eq!(error, LoginError::InvalidCredentials);
        assert_eq!(error.message(), "Email ou senha inválidos");
        assert!(t.storage.is_empty());
        assert!(t.navigator.history().is_empty());
    }

    #[test]
    fn empty_fields_never_reach_the_server() {
        let t = TestApp::at("/login");
        let vm = LoginViewModel::new(&t.app);

        let error = block_on(vm.submit("  ", "")).unwrap_err();

        assert!(matches!(error, LoginError::Validation(ref e) if e.len() == 2));
        assert!(t.transport.requests().is_empty());
    }

    #[test]
    fn network_failure_is_not_blamed_on_the_password() {
        let t = TestApp::at("/login");
        t.transport.fail_next(MockFailure::Network);
        let vm = LoginViewModel::new(&t.app);

        let error = block_on(vm.submit("teste@vidaplus.com", "123456")).unwrap_err();
        assert!(error.message().starts_with("Erro de conexão"));
    }

    #[test]
    fn expired_flag_shows_the_banner() {
        let t = TestApp::at("/login?expired=true");
        assert_eq!(
            LoginViewModel::new(&t.app).expired_banner(),
            Some("Sessão expirada. Por favor, faça login novamente.")
        );
        let t = TestApp::at("/login?expired=false");
        assert_eq!(LoginViewModel::new(&t.app).expired_banner(), None);
    }

    #[test]
    fn signed_in_user_skips_the_form() {
        let t = TestApp::signed_in("/login?redirect=%2Fpacientes");
        let vm = LoginViewModel::new(&t.app);
        assert!(vm.redirect_if_authenticated());
        assert_eq!(t.location(), "/pacientes");
    }
}
