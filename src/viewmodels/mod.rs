// ============================================================================
// VIEWMODELS - Screen logic, no DOM
// ============================================================================

pub mod consultas_viewmodel;
pub mod dashboard_viewmodel;
pub mod forms;
pub mod login_viewmodel;
pub mod pacientes_viewmodel;
pub mod request_state;
pub mod telemedicina_viewmodel;

pub use consultas_viewmodel::ConsultasViewModel;
pub use dashboard_viewmodel::{DashboardViewModel, Periodo};
pub use forms::{ConsultaForm, PacienteForm, ValidationErrors};
pub use login_viewmodel::{LoginError, LoginViewModel};
pub use pacientes_viewmodel::{OrdenacaoPaciente, PacientesViewModel};
pub use request_state::RequestState;
pub use telemedicina_viewmodel::{EstadoChamada, TelemedicinaViewModel};

use thiserror::Error;

use crate::services::ApiError;

/// Outcome of submitting a dialog form
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    #[error("form has invalid fields")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Portuguese text for an API failure, as shown in the snackbar.
pub fn error_message(error: &ApiError) -> String {
    match error {
        ApiError::AuthExpired => "Sessão expirada".to_string(),
        ApiError::Forbidden { .. } => "Acesso não autorizado ao recurso".to_string(),
        ApiError::ServerError { message, .. } => message.clone(),
        ApiError::NetworkUnavailable(_) => {
            "Erro de conexão: verifique sua conexão com a internet".to_string()
        }
        ApiError::RequestMisconfigured(_) => "Erro ao preparar a requisição".to_string(),
        ApiError::InvalidPayload(_) => "Resposta inesperada do servidor".to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::rc::Rc;

    use crate::config::AppConfig;
    use crate::models::Session;
    use crate::routing::{MemoryNavigator, Navigator};
    use crate::services::mock_transport::{mock_user, MOCK_TOKEN};
    use crate::services::MockTransport;
    use crate::state::{AppState, Platform};
    use crate::utils::{ManualScheduler, MemoryStorage};

    pub struct TestApp {
        pub app: AppState,
        pub transport: MockTransport,
        pub navigator: MemoryNavigator,
        pub storage: MemoryStorage,
        pub scheduler: ManualScheduler,
    }

    impl TestApp {
        pub fn at(location: &str) -> Self {
            let transport = MockTransport::new();
            let navigator = MemoryNavigator::new(location);
            let storage = MemoryStorage::new();
            let scheduler = ManualScheduler::new();
            let app = AppState::new(
                AppConfig::default(),
                Platform {
                    storage: Rc::new(storage.clone()),
                    navigator: Rc::new(navigator.clone()),
                    scheduler: Rc::new(scheduler.clone()),
                    transport: Rc::new(transport.clone()),
                },
            );
            Self {
                app,
                transport,
                navigator,
                storage,
                scheduler,
            }
        }

        /// Same, with the fixture session stored and hydrated.
        pub fn signed_in(location: &str) -> Self {
            let test = Self::at(location);
            if let Err(e) = test.app.store.save(&Session::new(mock_user(), MOCK_TOKEN)) {
                panic!("memory storage refused a write: {}", e);
            }
            test.app.session.hydrate();
            test
        }

        pub fn location(&self) -> String {
            self.navigator.current_location()
        }

        pub fn snackbar(&self) -> Option<String> {
            self.app.notifications.visible().map(|message| message.text)
        }
    }
}
