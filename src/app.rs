// ============================================================================
// APP - Browser shell: routing, guard, screen lifecycle, full re-render
// ============================================================================

use std::rc::Rc;

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::config::CONFIG;
use crate::dom::{append_child, clear_children, get_element_by_id, on_popstate, set_document_title};
use crate::routing::{BrowserNavigator, GuardState, GuardView, Route, RouteGuard};
use crate::state::{AppState, Platform};
use crate::viewmodels::{
    ConsultasViewModel, DashboardViewModel, LoginViewModel, PacientesViewModel,
    TelemedicinaViewModel,
};
use crate::views::{
    mount_loading_bar, mount_snackbar, render_consultas, render_dashboard,
    render_dashboard_avancado, render_layout, render_login, render_not_found, render_pacientes,
    render_telemedicina, widgets::spinner,
};

/// Today's date in the browser's local time zone
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_else(|| chrono::Utc::now().date_naive())
}

/// View-models of the screen currently mounted
enum Screen {
    Login(Rc<LoginViewModel>),
    Dashboard(DashboardViewModel),
    DashboardAvancado(DashboardViewModel),
    Pacientes(PacientesViewModel),
    Consultas(ConsultasViewModel),
    Telemedicina(TelemedicinaViewModel, ConsultasViewModel),
    NotFound,
}

impl Screen {
    /// Builds the screen's view-models, hooks them to the re-render and
    /// starts their first load.
    fn open(route: Route, app: &AppState) -> Self {
        let notify = {
            let app = app.clone();
            move || app.notify_subscribers()
        };
        let hoje = today();

        match route {
            Route::Login => Screen::Login(Rc::new(LoginViewModel::new(app))),
            Route::Dashboard | Route::DashboardAvancado => {
                let vm = DashboardViewModel::new(app, hoje);
                vm.estatisticas.subscribe(notify.clone());
                vm.indicadores.subscribe(notify.clone());
                vm.consultas.subscribe(notify.clone());
                vm.periodo.subscribe(notify);
                let loader = vm.clone();
                spawn_local(async move { loader.carregar().await });
                if route == Route::Dashboard {
                    Screen::Dashboard(vm)
                } else {
                    Screen::DashboardAvancado(vm)
                }
            }
            Route::Pacientes => {
                let vm = PacientesViewModel::new(app);
                vm.lista.subscribe(notify);
                let loader = vm.clone();
                spawn_local(async move { loader.carregar().await });
                Screen::Pacientes(vm)
            }
            Route::Consultas => {
                let vm = ConsultasViewModel::new(app);
                vm.lista.subscribe(notify);
                let loader = vm.clone();
                spawn_local(async move { loader.carregar().await });
                Screen::Consultas(vm)
            }
            Route::Telemedicina => {
                let chamada = TelemedicinaViewModel::new(app);
                chamada.estado.subscribe(notify.clone());
                let consultas = ConsultasViewModel::new(app);
                consultas.lista.subscribe(notify);
                let loader = consultas.clone();
                spawn_local(async move { loader.carregar().await });
                Screen::Telemedicina(chamada, consultas)
            }
            Route::NotFound => Screen::NotFound,
        }
    }

    fn dispose(&self) {
        match self {
            Screen::Dashboard(vm) | Screen::DashboardAvancado(vm) => vm.dispose(),
            Screen::Pacientes(vm) => vm.dispose(),
            Screen::Consultas(vm) => vm.dispose(),
            Screen::Telemedicina(chamada, consultas) => {
                consultas.dispose();
                let chamada = chamada.clone();
                spawn_local(async move { chamada.sair().await });
            }
            Screen::Login(_) | Screen::NotFound => {}
        }
    }

    fn render(&self, app: &AppState) -> Result<Element, JsValue> {
        match self {
            Screen::Login(vm) => render_login(app, vm.clone()),
            Screen::Dashboard(vm) => render_dashboard(vm),
            Screen::DashboardAvancado(vm) => render_dashboard_avancado(vm),
            Screen::Pacientes(vm) => render_pacientes(vm),
            Screen::Consultas(vm) => render_consultas(vm),
            Screen::Telemedicina(chamada, consultas) => render_telemedicina(chamada, consultas),
            Screen::NotFound => render_not_found(app),
        }
    }
}

pub struct App {
    state: AppState,
    root: Element,
    /// Screen key (route path, or full location for login) and its view-models
    current: Option<(String, Screen)>,
    guard: Option<RouteGuard>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let navigator = BrowserNavigator::new();
        let platform = Platform::browser(&CONFIG, Rc::new(navigator.clone()));
        let state = AppState::new(CONFIG.clone(), platform);
        state.session.hydrate();

        // Navigation, back/forward and session changes all redraw
        {
            let state = state.clone();
            navigator.set_on_change(move || state.notify_subscribers());
        }
        {
            let notifier = state.clone();
            state.session.subscribe(move || notifier.notify_subscribers());
        }
        {
            let state = state.clone();
            on_popstate(move |_| state.notify_subscribers())?;
        }
        state.subscribe_to_changes(crate::schedule_render);

        mount_loading_bar(&state)?;
        mount_snackbar(&state)?;

        Ok(Self {
            state,
            root,
            current: None,
            guard: None,
        })
    }

    pub fn render(&mut self) -> Result<(), JsValue> {
        let location = self.state.current_location();
        let route = Route::from_location(&location);
        let key = match route {
            Route::Login => location.clone(),
            _ => route.path().to_string(),
        };
        set_document_title(&format!("{} - SGHSS VidaPlus", route.title()));

        let changed = self.current.as_ref().map(|(k, _)| k != &key).unwrap_or(true);
        let session_lost = route.is_protected() && !self.state.session.is_authenticated();
        if (changed || session_lost) && !self.switch_screen(route, &location, key) {
            clear_children(&self.root);
            return Ok(());
        }

        let screen = match &self.current {
            Some((_, screen)) => screen,
            None => return Ok(()),
        };

        let content = if route.is_protected() {
            let guard = match &self.guard {
                Some(guard) => guard,
                None => return Ok(()),
            };
            match guard.view(|| screen.render(&self.state)) {
                GuardView::Content(content) => render_layout(&self.state, route, content?)?,
                GuardView::Loading => spinner("Verificando sessão...")?,
                GuardView::Redirected(target) => {
                    log::debug!("↪️ Guard redirected to {}", target);
                    return Ok(());
                }
            }
        } else {
            screen.render(&self.state)?
        };

        clear_children(&self.root);
        append_child(&self.root, &content)
    }

    /// Disposes the old screen and opens the new one. Returns false when a
    /// redirect was issued instead.
    fn switch_screen(&mut self, route: Route, location: &str, key: String) -> bool {
        if let Some((old_key, old)) = self.current.take() {
            log::debug!("🧹 Leaving {}", old_key);
            old.dispose();
        }
        self.guard = None;

        if route.is_protected() {
            let mut guard = RouteGuard::new(location);
            let state = guard.resolve(
                &self.state.store,
                &self.state.session,
                self.state.navigator.as_ref(),
            );
            self.guard = Some(guard);
            if state != GuardState::Authenticated {
                return false;
            }
        } else {
            let vm = LoginViewModel::new(&self.state);
            if vm.redirect_if_authenticated() {
                return false;
            }
            self.current = Some((key, Screen::Login(Rc::new(vm))));
            return true;
        }

        log::info!("📄 Opening {}", route.title());
        self.current = Some((key, Screen::open(route, &self.state)));
        true
    }
}
