// ============================================================================
// CONSULTA SERVICE - /consultas
// ============================================================================

use serde_json::json;

use crate::models::{Consulta, ConsultaFiltro, NovaConsulta};
use crate::services::api_client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct ConsultaService {
    api: ApiClient,
}

impl ConsultaService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn listar(&self, filtro: &ConsultaFiltro) -> Result<Vec<Consulta>, ApiError> {
        let consultas: Option<Vec<Consulta>> =
            self.api.get("/consultas", &filtro.to_query()).await?;
        Ok(consultas.unwrap_or_default())
    }

    pub async fn obter(&self, id: u64) -> Result<Consulta, ApiError> {
        self.api.get(&format!("/consultas/{}", id), &[]).await
    }

    pub async fn criar(&self, consulta: &NovaConsulta) -> Result<Consulta, ApiError> {
        let criada: Consulta = self.api.post("/consultas", consulta).await?;
        log::info!("📅 Consulta {} scheduled for {} {}", criada.id, criada.data, criada.hora);
        Ok(criada)
    }

    pub async fn atualizar(&self, id: u64, consulta: &NovaConsulta) -> Result<Consulta, ApiError> {
        self.api.put(&format!("/consultas/{}", id), consulta).await
    }

    pub async fn cancelar(&self, id: u64, motivo: Option<&str>) -> Result<(), ApiError> {
        self.api
            .patch::<_, serde_json::Value>(
                &format!("/consultas/{}/cancelar", id),
                &json!({ "motivo": motivo }),
            )
            .await?;
        log::info!("🚫 Consulta {} cancelled", id);
        Ok(())
    }

    pub async fn concluir(&self, id: u64, observacoes: Option<&str>) -> Result<Consulta, ApiError> {
        self.api
            .patch(
                &format!("/consultas/{}/concluir", id),
                &json!({ "observacoes": observacoes }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsultaStatus, ConsultaTipo};
    use crate::services::test_support::signed_in_client;
    use futures::executor::block_on;

    #[test]
    fn status_filter_reaches_the_backend() {
        let (transport, api) = signed_in_client();
        let service = ConsultaService::new(api);
        let filtro = ConsultaFiltro {
            status: Some(ConsultaStatus::Confirmada),
            ..ConsultaFiltro::default()
        };

        let consultas = block_on(service.listar(&filtro)).unwrap();

        assert_eq!(consultas.len(), 1);
        assert_eq!(consultas[0].paciente, "Maria Santos");
        assert!(transport.last_request().unwrap().url.ends_with("/consultas?status=confirmada"));
    }

    #[test]
    fn schedule_then_conclude() {
        let (_, api) = signed_in_client();
        let service = ConsultaService::new(api);
        let nova = NovaConsulta {
            paciente: "João Silva".into(),
            medico: "Dra. Ana Lima".into(),
            data: "2024-01-10".into(),
            hora: "09:00".into(),
            tipo: ConsultaTipo::Telemedicina,
        };

        let criada = block_on(service.criar(&nova)).unwrap();
        assert_eq!(criada.status, ConsultaStatus::Agendada);

        let concluida = block_on(service.concluir(criada.id, Some("Retorno em 30 dias"))).unwrap();
        assert_eq!(concluida.status, ConsultaStatus::Concluida);

        let error = block_on(service.cancelar(criada.id, None)).unwrap_err();
        assert_eq!(error.status(), Some(409));
    }
}
