// ============================================================================
// APP STATE - Everything a screen needs, wired once at start-up
// ============================================================================
// Cloning is cheap: every field shares its cell with the original.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::routing::Navigator;
use crate::services::{
    ApiClient, AuthService, ConsultaService, DashboardService, PacienteService,
    ProfissionalService, ProntuarioService, TelemedicinaService, Transport,
};
use crate::state::{LoadingState, NotificationChannel, SessionContext};
use crate::stores::SessionStore;
use crate::utils::{KeyValueStorage, Scheduler};

/// Platform seams the state is built on
#[derive(Clone)]
pub struct Platform {
    pub storage: Rc<dyn KeyValueStorage>,
    pub navigator: Rc<dyn Navigator>,
    pub scheduler: Rc<dyn Scheduler>,
    pub transport: Rc<dyn Transport>,
}

impl Platform {
    /// Browser storage, history, timers; transport picked by `use_mock_api`.
    #[cfg(target_arch = "wasm32")]
    pub fn browser(config: &AppConfig, navigator: Rc<dyn Navigator>) -> Self {
        use crate::services::{GlooTransport, MockTransport};
        use crate::utils::{BrowserScheduler, BrowserStorage};

        let transport: Rc<dyn Transport> = if config.use_mock_api {
            log::info!("🧪 Using the in-memory mock backend");
            Rc::new(MockTransport::new())
        } else {
            log::info!("🌐 Using backend at {}", config.api_url);
            Rc::new(GlooTransport::new())
        };

        Self {
            storage: Rc::new(BrowserStorage),
            navigator,
            scheduler: Rc::new(BrowserScheduler),
            transport,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub navigator: Rc<dyn Navigator>,
    pub store: SessionStore,
    pub session: SessionContext,
    pub loading: LoadingState,
    pub notifications: NotificationChannel,
    pub api: ApiClient,

    pub auth: AuthService,
    pub pacientes: PacienteService,
    pub consultas: ConsultaService,
    pub profissionais: ProfissionalService,
    pub prontuarios: ProntuarioService,
    pub telemedicina: TelemedicinaService,
    pub dashboard: DashboardService,

    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new(config: AppConfig, platform: Platform) -> Self {
        let store = SessionStore::new(platform.storage.clone());
        let session = SessionContext::new(store.clone(), platform.navigator.clone());
        let loading = LoadingState::new();
        let notifications =
            NotificationChannel::new(platform.scheduler.clone(), config.notification_duration_ms);
        let api = ApiClient::new(
            &config.api_url,
            config.request_timeout_ms,
            platform.transport.clone(),
            store.clone(),
            platform.navigator.clone(),
            loading.clone(),
        );

        // A 401 anywhere drops the in-memory session too
        let expired_session = session.clone();
        api.set_on_session_expired(move || expired_session.reset());

        Self {
            auth: AuthService::new(api.clone(), session.clone()),
            pacientes: PacienteService::new(api.clone()),
            consultas: ConsultaService::new(api.clone()),
            profissionais: ProfissionalService::new(api.clone()),
            prontuarios: ProntuarioService::new(api.clone()),
            telemedicina: TelemedicinaService::new(api.clone()),
            dashboard: DashboardService::new(api.clone()),
            config,
            navigator: platform.navigator,
            store,
            session,
            loading,
            notifications,
            api,
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn current_location(&self) -> String {
        self.navigator.current_location()
    }

    /// Soft navigation; the navigator's change hook triggers the re-render.
    pub fn navigate(&self, location: &str) {
        self.navigator.navigate(location);
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        let subscribers: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::MemoryNavigator;
    use crate::services::{MockFailure, MockTransport};
    use crate::utils::{ManualScheduler, MemoryStorage};
    use futures::executor::block_on;
    use std::cell::Cell;

    #[test]
    fn expired_token_resets_the_shared_context() {
        let transport = MockTransport::new();
        let navigator = MemoryNavigator::new("/pacientes");
        let app = AppState::new(
            AppConfig::default(),
            Platform {
                storage: Rc::new(MemoryStorage::new()),
                navigator: Rc::new(navigator.clone()),
                scheduler: Rc::new(ManualScheduler::new()),
                transport: Rc::new(transport.clone()),
            },
        );
        block_on(app.auth.login("teste@vidaplus.com", "123456")).unwrap();
        assert!(app.session.is_authenticated());

        transport.fail_next(MockFailure::Status(401, String::new()));
        let _ = block_on(app.dashboard.estatisticas());

        assert!(!app.session.is_authenticated());
        assert_eq!(navigator.hard_redirects(), vec!["/login?expired=true".to_string()]);
    }

    #[test]
    fn subscribers_run_on_every_notification() {
        let navigator = MemoryNavigator::new("/");
        let app = AppState::new(
            AppConfig::default(),
            Platform {
                storage: Rc::new(MemoryStorage::new()),
                navigator: Rc::new(navigator.clone()),
                scheduler: Rc::new(ManualScheduler::new()),
                transport: Rc::new(MockTransport::new()),
            },
        );
        let renders = Rc::new(Cell::new(0));
        let counter = renders.clone();
        app.subscribe_to_changes(move || counter.set(counter.get() + 1));

        app.navigate("/consultas");
        app.notify_subscribers();
        app.notify_subscribers();

        assert_eq!(app.current_location(), "/consultas");
        assert_eq!(renders.get(), 2);
    }
}
