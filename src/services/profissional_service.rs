// ============================================================================
// PROFISSIONAL SERVICE - /profissionais
// ============================================================================

use crate::models::{AgendaSlot, Profissional};
use crate::services::api_client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct ProfissionalService {
    api: ApiClient,
}

impl ProfissionalService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn listar(&self, especialidade: Option<&str>) -> Result<Vec<Profissional>, ApiError> {
        let query: Vec<(&str, String)> = especialidade
            .filter(|e| !e.trim().is_empty())
            .map(|e| ("especialidade", e.trim().to_string()))
            .into_iter()
            .collect();
        let profissionais: Option<Vec<Profissional>> = self.api.get("/profissionais", &query).await?;
        Ok(profissionais.unwrap_or_default())
    }

    pub async fn obter(&self, id: u64) -> Result<Profissional, ApiError> {
        self.api.get(&format!("/profissionais/{}", id), &[]).await
    }

    /// Slots for one day, `data` as `yyyy-MM-dd`.
    pub async fn agenda(&self, id: u64, data: &str) -> Result<Vec<AgendaSlot>, ApiError> {
        let slots: Option<Vec<AgendaSlot>> = self
            .api
            .get(&format!("/profissionais/{}/agenda", id), &[("data", data.to_string())])
            .await?;
        Ok(slots.unwrap_or_default())
    }
}
