// ============================================================================
// PACIENTE SERVICE - /pacientes
// ============================================================================

use crate::models::{NovoPaciente, Paciente, PacienteFiltro};
use crate::services::api_client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct PacienteService {
    api: ApiClient,
}

impl PacienteService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// A `null` body counts as an empty list.
    pub async fn listar(&self, filtro: &PacienteFiltro) -> Result<Vec<Paciente>, ApiError> {
        let pacientes: Option<Vec<Paciente>> = self.api.get("/pacientes", &filtro.to_query()).await?;
        let pacientes = pacientes.unwrap_or_default();
        log::info!("👥 {} pacientes loaded", pacientes.len());
        Ok(pacientes)
    }

    pub async fn obter(&self, id: u64) -> Result<Paciente, ApiError> {
        self.api.get(&format!("/pacientes/{}", id), &[]).await
    }

    pub async fn criar(&self, paciente: &NovoPaciente) -> Result<Paciente, ApiError> {
        let criado: Paciente = self.api.post("/pacientes", paciente).await?;
        log::info!("✅ Paciente {} created (id {})", criado.nome, criado.id);
        Ok(criado)
    }

    pub async fn atualizar(&self, id: u64, paciente: &NovoPaciente) -> Result<Paciente, ApiError> {
        self.api.put(&format!("/pacientes/{}", id), paciente).await
    }

    pub async fn excluir(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete(&format!("/pacientes/{}", id)).await?;
        log::info!("🗑️ Paciente {} removed", id);
        Ok(())
    }
}
