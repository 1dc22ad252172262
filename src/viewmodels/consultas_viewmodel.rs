// ============================================================================
// CONSULTAS VIEWMODEL - Appointment list, scheduling, cancel / conclude
// ============================================================================

use crate::models::{Consulta, ConsultaFiltro};
use crate::services::ApiError;
use crate::state::{AppState, ReactiveState};
use crate::viewmodels::{error_message, ConsultaForm, FormError, RequestState};

/// Patient or doctor name, case-insensitive
pub fn filtrar(consultas: &[Consulta], busca: &str) -> Vec<Consulta> {
    let busca = busca.trim().to_lowercase();
    consultas
        .iter()
        .filter(|c| {
            busca.is_empty()
                || c.paciente.to_lowercase().contains(&busca)
                || c.medico.to_lowercase().contains(&busca)
        })
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct ConsultasViewModel {
    app: AppState,
    pub lista: RequestState<Vec<Consulta>>,
    pub busca: ReactiveState<String>,
    pub filtro: ReactiveState<ConsultaFiltro>,
}

impl ConsultasViewModel {
    pub fn new(app: &AppState) -> Self {
        Self {
            app: app.clone(),
            lista: RequestState::new(Some(Vec::new())),
            busca: ReactiveState::new(String::new()),
            filtro: ReactiveState::default(),
        }
    }

    pub async fn carregar(&self) {
        let service = self.app.consultas.clone();
        let filtro = self.filtro.get();
        let result = self
            .lista
            .execute(async move { service.listar(&filtro).await })
            .await;
        if let Err(e) = result {
            self.notificar_erro("Erro ao carregar consultas", &e);
        }
    }

    pub fn visiveis(&self) -> Vec<Consulta> {
        filtrar(&self.lista.data().unwrap_or_default(), &self.busca.get())
    }

    pub async fn agendar(&self, form: &ConsultaForm) -> Result<Consulta, FormError> {
        let nova = form.validate().map_err(FormError::Validation)?;
        match self.app.consultas.criar(&nova).await {
            Ok(consulta) => {
                self.substituir(consulta.clone());
                self.app.notifications.success("Consulta agendada com sucesso");
                Ok(consulta)
            }
            Err(e) => {
                self.notificar_erro("Erro ao agendar consulta", &e);
                Err(FormError::Api(e))
            }
        }
    }

    pub async fn cancelar(&self, id: u64, motivo: Option<&str>) -> Result<(), ApiError> {
        match self.app.consultas.cancelar(id, motivo).await {
            Ok(()) => {
                // The cancel endpoint does not echo the record; refresh the row
                if self.lista.is_alive() {
                    match self.app.consultas.obter(id).await {
                        Ok(consulta) => self.substituir(consulta),
                        Err(e) => log::warn!("⚠️ Could not refresh consulta {}: {}", id, e),
                    }
                }
                self.app.notifications.success("Consulta cancelada");
                Ok(())
            }
            Err(e) => {
                self.notificar_erro("Erro ao cancelar consulta", &e);
                Err(e)
            }
        }
    }

    pub async fn concluir(&self, id: u64, observacoes: Option<&str>) -> Result<Consulta, ApiError> {
        match self.app.consultas.concluir(id, observacoes).await {
            Ok(consulta) => {
                self.substituir(consulta.clone());
                self.app.notifications.success("Consulta concluída");
                Ok(consulta)
            }
            Err(e) => {
                self.notificar_erro("Erro ao concluir consulta", &e);
                Err(e)
            }
        }
    }

    pub fn dispose(&self) {
        self.lista.dispose();
    }

    fn substituir(&self, consulta: Consulta) {
        if !self.lista.is_alive() {
            return;
        }
        let mut lista = self.lista.data().unwrap_or_default();
        match lista.iter_mut().find(|c| c.id == consulta.id) {
            Some(existente) => *existente = consulta,
            None => lista.push(consulta),
        }
        self.lista.set_data(Some(lista));
    }

    fn notificar_erro(&self, contexto: &str, error: &ApiError) {
        if error.is_auth_expired() || !self.lista.is_alive() {
            return;
        }
        self.app
            .notifications
            .error(format!("{}: {}", contexto, error_message(error)));
    }
}
