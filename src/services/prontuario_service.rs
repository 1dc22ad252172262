// ============================================================================
// PRONTUARIO SERVICE - /pacientes/{id}/prontuario
// ============================================================================

use crate::models::{Anotacao, Exame, NovaAnotacao, NovoExame, Prontuario};
use crate::services::api_client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct ProntuarioService {
    api: ApiClient,
}

impl ProntuarioService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn obter(&self, paciente_id: u64) -> Result<Prontuario, ApiError> {
        self.api
            .get(&format!("/pacientes/{}/prontuario", paciente_id), &[])
            .await
    }

    pub async fn adicionar_anotacao(
        &self,
        paciente_id: u64,
        anotacao: &NovaAnotacao,
    ) -> Result<Anotacao, ApiError> {
        self.api
            .post(&format!("/pacientes/{}/prontuario/anotacoes", paciente_id), anotacao)
            .await
    }

    pub async fn adicionar_exame(&self, paciente_id: u64, exame: &NovoExame) -> Result<Exame, ApiError> {
        self.api
            .post(&format!("/pacientes/{}/prontuario/exames", paciente_id), exame)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::signed_in_client;
    use futures::executor::block_on;

    #[test]
    fn reads_record_and_appends_entries() {
        let (transport, api) = signed_in_client();
        let service = ProntuarioService::new(api);

        let prontuario = block_on(service.obter(2)).unwrap();
        assert_eq!(prontuario.paciente_id, 2);
        assert_eq!(prontuario.alergias, vec!["Dipirona".to_string()]);

        let exame = NovoExame {
            tipo: "Hemograma".into(),
            resultado: "Normal".into(),
            data: "2024-01-10".into(),
            arquivo_url: None,
            profissional_id: 1,
        };
        assert_eq!(block_on(service.adicionar_exame(2, &exame)).unwrap(), exame);
        let body = transport.last_request().unwrap().body.unwrap();
        assert!(body.contains("\"profissionalId\":1"));
        assert!(!body.contains("arquivoUrl"));
    }

    #[test]
    fn unknown_patient_has_no_record() {
        let (_, api) = signed_in_client();
        let service = ProntuarioService::new(api);
        assert_eq!(block_on(service.obter(42)).unwrap_err().status(), Some(404));
    }
}
