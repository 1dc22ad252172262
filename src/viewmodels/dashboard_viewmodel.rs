// ============================================================================
// DASHBOARD VIEWMODEL - Statistics, indicators and consultations per period
// ============================================================================

use chrono::{Duration, Months, NaiveDate};

use crate::models::{ConsultasPorPeriodo, Estatisticas, Indicadores};
use crate::services::ApiError;
use crate::state::{AppState, ReactiveState};
use crate::viewmodels::{error_message, RequestState};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodo {
    SeteDias,
    TrintaDias,
    TresMeses,
    Personalizado { inicio: NaiveDate, fim: NaiveDate },
}

impl Periodo {
    /// Select value used by the period picker
    pub fn chave(&self) -> &'static str {
        match self {
            Periodo::SeteDias => "7dias",
            Periodo::TrintaDias => "30dias",
            Periodo::TresMeses => "3meses",
            Periodo::Personalizado { .. } => "personalizado",
        }
    }

    /// `personalizado` starts as the last seven days until the user edits it.
    pub fn from_chave(chave: &str, hoje: NaiveDate) -> Option<Self> {
        match chave {
            "7dias" => Some(Periodo::SeteDias),
            "30dias" => Some(Periodo::TrintaDias),
            "3meses" => Some(Periodo::TresMeses),
            "personalizado" => Some(Periodo::Personalizado {
                inicio: hoje - Duration::days(7),
                fim: hoje,
            }),
            _ => None,
        }
    }

    /// `[inicio, fim]` relative to `hoje`
    pub fn intervalo(&self, hoje: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            Periodo::SeteDias => (hoje - Duration::days(7), hoje),
            Periodo::TrintaDias => (hoje - Duration::days(30), hoje),
            Periodo::TresMeses => (
                hoje.checked_sub_months(Months::new(3)).unwrap_or(hoje),
                hoje,
            ),
            Periodo::Personalizado { inicio, fim } if inicio <= fim => (inicio, fim),
            Periodo::Personalizado { inicio, fim } => (fim, inicio),
        }
    }

    pub fn intervalo_formatado(&self, hoje: NaiveDate) -> (String, String) {
        let (inicio, fim) = self.intervalo(hoje);
        (
            inicio.format(DATE_FORMAT).to_string(),
            fim.format(DATE_FORMAT).to_string(),
        )
    }
}

#[derive(Clone)]
pub struct DashboardViewModel {
    app: AppState,
    hoje: NaiveDate,
    pub periodo: ReactiveState<Periodo>,
    pub estatisticas: RequestState<Estatisticas>,
    pub indicadores: RequestState<Indicadores>,
    pub consultas: RequestState<ConsultasPorPeriodo>,
}

impl DashboardViewModel {
    pub fn new(app: &AppState, hoje: NaiveDate) -> Self {
        Self {
            app: app.clone(),
            hoje,
            periodo: ReactiveState::new(Periodo::SeteDias),
            estatisticas: RequestState::new(None),
            indicadores: RequestState::new(None),
            consultas: RequestState::new(None),
        }
    }

    /// Everything the screen shows on open
    pub async fn carregar(&self) {
        let service = self.app.dashboard.clone();
        if let Err(e) = self
            .estatisticas
            .execute(async move { service.estatisticas().await })
            .await
        {
            self.notificar_erro("Erro ao carregar estatísticas", &e);
        }
        if !self.ativo() {
            return;
        }

        let service = self.app.dashboard.clone();
        if let Err(e) = self
            .indicadores
            .execute(async move { service.indicadores().await })
            .await
        {
            self.notificar_erro("Erro ao carregar indicadores", &e);
        }
        if !self.ativo() {
            return;
        }

        self.atualizar_consultas().await;
    }

    /// Presets reload right away; a custom range waits for `atualizar_consultas`.
    pub async fn selecionar_periodo(&self, periodo: Periodo) {
        self.periodo.set(periodo);
        if !matches!(periodo, Periodo::Personalizado { .. }) {
            self.atualizar_consultas().await;
        }
    }

    pub fn hoje(&self) -> NaiveDate {
        self.hoje
    }

    /// Edits one end of a custom range; presets become a custom range first.
    pub fn editar_intervalo(&self, inicio: Option<NaiveDate>, fim: Option<NaiveDate>) {
        let (atual_inicio, atual_fim) = self.periodo.get().intervalo(self.hoje);
        self.periodo.set(Periodo::Personalizado {
            inicio: inicio.unwrap_or(atual_inicio),
            fim: fim.unwrap_or(atual_fim),
        });
    }

    pub fn intervalo(&self) -> (String, String) {
        self.periodo.get().intervalo_formatado(self.hoje)
    }

    pub async fn atualizar_consultas(&self) {
        if !self.ativo() {
            return;
        }
        let (inicio, fim) = self.intervalo();
        let service = self.app.dashboard.clone();
        if let Err(e) = self
            .consultas
            .execute(async move { service.consultas_por_periodo(&inicio, &fim).await })
            .await
        {
            self.notificar_erro("Erro ao carregar dados de consultas", &e);
        }
    }

    pub fn dispose(&self) {
        self.estatisticas.dispose();
        self.indicadores.dispose();
        self.consultas.dispose();
    }

    /// False once the screen was closed
    fn ativo(&self) -> bool {
        self.estatisticas.is_alive()
    }

    fn notificar_erro(&self, contexto: &str, error: &ApiError) {
        if error.is_auth_expired() || !self.ativo() {
            return;
        }
        self.app
            .notifications
            .error(format!("{}: {}", contexto, error_message(error)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockFailure;
    use crate::viewmodels::testing::TestApp;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    fn dia(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn presets_compute_their_ranges() {
        let hoje = dia(2024, 5, 31);
        assert_eq!(
            Periodo::SeteDias.intervalo_formatado(hoje),
            ("2024-05-24".to_string(), "2024-05-31".to_string())
        );
        assert_eq!(Periodo::TrintaDias.intervalo(hoje).0, dia(2024, 5, 1));
        // end-of-month clamps instead of overflowing
        assert_eq!(Periodo::TresMeses.intervalo(hoje).0, dia(2024, 2, 29));

        let invertido = Periodo::Personalizado {
            inicio: dia(2024, 3, 10),
            fim: dia(2024, 3, 1),
        };
        assert_eq!(invertido.intervalo(hoje), (dia(2024, 3, 1), dia(2024, 3, 10)));
        assert_eq!(Periodo::from_chave("3meses", hoje), Some(Periodo::TresMeses));
        assert_eq!(Periodo::from_chave("anual", hoje), None);
    }

    #[test]
    fn opening_loads_every_panel() {
        let t = TestApp::signed_in("/");
        let vm = DashboardViewModel::new(&t.app, dia(2024, 1, 8));

        block_on(vm.carregar());

        assert_eq!(vm.estatisticas.data().map(|s| s.consultas_hoje), Some(12));
        assert!(vm.indicadores.data().is_some());
        assert_eq!(vm.consultas.data().map(|c| c.data_inicio), Some("2024-01-01".into()));
    }

    #[test]
    fn custom_period_waits_for_apply() {
        let t = TestApp::signed_in("/");
        let vm = DashboardViewModel::new(&t.app, dia(2024, 1, 8));
        let antes = t.transport.requests().len();

        block_on(vm.selecionar_periodo(Periodo::Personalizado {
            inicio: dia(2023, 12, 1),
            fim: dia(2023, 12, 31),
        }));
        assert_eq!(t.transport.requests().len(), antes);

        block_on(vm.atualizar_consultas());
        assert!(t
            .transport
            .last_request()
            .unwrap()
            .url
            .ends_with("dataInicio=2023-12-01&dataFim=2023-12-31"));
    }

    #[test]
    fn editing_a_preset_turns_it_custom() {
        let t = TestApp::signed_in("/");
        let vm = DashboardViewModel::new(&t.app, dia(2024, 1, 8));

        vm.editar_intervalo(None, Some(dia(2024, 1, 5)));

        assert_eq!(
            vm.periodo.get(),
            Periodo::Personalizado {
                inicio: dia(2024, 1, 1),
                fim: dia(2024, 1, 5)
            }
        );
        assert_eq!(vm.intervalo(), ("2024-01-01".to_string(), "2024-01-05".to_string()));
    }

    #[test]
    fn panel_failures_are_prefixed() {
        let t = TestApp::signed_in("/");
        let vm = DashboardViewModel::new(&t.app, dia(2024, 1, 8));
        t.transport.fail_next(MockFailure::Network);

        block_on(vm.carregar());

        // later panels succeed, the snackbar keeps the first failure
        assert_eq!(
            t.snackbar(),
            Some("Erro ao carregar estatísticas: Erro de conexão: verifique sua conexão com a internet".into())
        );
        assert!(vm.indicadores.data().is_some());
    }

    #[test]
    fn closing_mid_load_stops_the_remaining_panels() {
        let t = TestApp::signed_in("/");
        let vm = DashboardViewModel::new(&t.app, dia(2024, 1, 8));
        let release = t.transport.hold_next();

        let mut pool = LocalPool::new();
        let loader = vm.clone();
        pool.spawner()
            .spawn_local(async move { loader.carregar().await })
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(t.transport.requests().len(), 1);

        vm.dispose();
        t.transport.fail_next(MockFailure::Status(500, String::new()));
        t.transport.fail_next(MockFailure::Status(500, String::new()));
        release.send(()).unwrap();
        pool.run();

        assert_eq!(t.transport.requests().len(), 1);
        assert_eq!(t.snackbar(), None);
        assert!(vm.estatisticas.data().is_none());
    }
}
