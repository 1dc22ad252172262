pub mod api_client;
pub mod auth_service;
pub mod consulta_service;
pub mod dashboard_service;
#[cfg(target_arch = "wasm32")]
pub mod gloo_transport;
pub mod mock_transport;
pub mod paciente_service;
pub mod profissional_service;
pub mod prontuario_service;
pub mod telemedicina_service;
pub mod transport;

pub use api_client::{ApiCall, ApiClient, ApiError};
pub use auth_service::AuthService;
pub use consulta_service::ConsultaService;
pub use dashboard_service::DashboardService;
#[cfg(target_arch = "wasm32")]
pub use gloo_transport::GlooTransport;
pub use mock_transport::{MockFailure, MockTransport};
pub use paciente_service::PacienteService;
pub use profissional_service::ProfissionalService;
pub use prontuario_service::ProntuarioService;
pub use telemedicina_service::TelemedicinaService;
pub use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use super::{ApiClient, MockTransport};
    use crate::routing::MemoryNavigator;
    use crate::services::mock_transport::mock_user;
    use crate::state::LoadingState;
    use crate::stores::SessionStore;
    use crate::models::Session;
    use crate::utils::MemoryStorage;

    /// Client against a fresh mock backend with the fixture session stored.
    pub fn signed_in_client() -> (MockTransport, ApiClient) {
        let transport = MockTransport::new();
        let store = SessionStore::new(Rc::new(MemoryStorage::new()));
        if let Err(e) = store.save(&Session::new(mock_user(), "mock-jwt-token")) {
            panic!("memory storage refused a write: {}", e);
        }
        let client = ApiClient::new(
            "http://localhost:3000/api",
            10_000,
            Rc::new(transport.clone()),
            store,
            Rc::new(MemoryNavigator::new("/")),
            LoadingState::new(),
        );
        (transport, client)
    }
}
