// ============================================================================
// DASHBOARD SERVICE - /dashboard
// ============================================================================

use crate::models::{ConsultasPorPeriodo, Estatisticas, Indicadores};
use crate::services::api_client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn estatisticas(&self) -> Result<Estatisticas, ApiError> {
        self.api.get("/dashboard/estatisticas", &[]).await
    }

    /// Dates as `yyyy-MM-dd`, both ends inclusive.
    pub async fn consultas_por_periodo(
        &self,
        data_inicio: &str,
        data_fim: &str,
    ) -> Result<ConsultasPorPeriodo, ApiError> {
        self.api
            .get(
                "/dashboard/consultas-por-periodo",
                &[
                    ("dataInicio", data_inicio.to_string()),
                    ("dataFim", data_fim.to_string()),
                ],
            )
            .await
    }

    pub async fn indicadores(&self) -> Result<Indicadores, ApiError> {
        self.api.get("/dashboard/indicadores", &[]).await
    }
}
