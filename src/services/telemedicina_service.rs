// ============================================================================
// TELEMEDICINA SERVICE - /telemedicina/sessao
// ============================================================================

use serde_json::json;

use crate::models::{GravacaoStatus, SessaoTelemedicina, TokenVideo};
use crate::services::api_client::{ApiClient, ApiError};

#[derive(Clone)]
pub struct TelemedicinaService {
    api: ApiClient,
}

impl TelemedicinaService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn iniciar_sessao(&self, consulta_id: u64) -> Result<SessaoTelemedicina, ApiError> {
        let sessao: SessaoTelemedicina = self
            .api
            .post_empty(&format!("/telemedicina/sessao/{}/iniciar", consulta_id))
            .await?;
        log::info!("🎥 Telemedicine session {} started", sessao.session_id);
        Ok(sessao)
    }

    pub async fn encerrar_sessao(&self, session_id: &str) -> Result<(), ApiError> {
        self.api
            .post_empty::<serde_json::Value>(&format!("/telemedicina/sessao/{}/encerrar", session_id))
            .await?;
        log::info!("🎥 Telemedicine session {} ended", session_id);
        Ok(())
    }

    pub async fn gerar_token(&self, session_id: &str) -> Result<TokenVideo, ApiError> {
        self.api
            .get(&format!("/telemedicina/sessao/{}/token", session_id), &[])
            .await
    }

    pub async fn gravar_sessao(&self, session_id: &str, gravar: bool) -> Result<GravacaoStatus, ApiError> {
        self.api
            .patch(
                &format!("/telemedicina/sessao/{}/gravacao", session_id),
                &json!({ "gravarEnabled": gravar }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::signed_in_client;
    use futures::executor::block_on;

    #[test]
    fn full_session_lifecycle() {
        let (_, api) = signed_in_client();
        let service = TelemedicinaService::new(api);

        let sessao = block_on(service.iniciar_sessao(2)).unwrap();
        assert_eq!(sessao.session_id, "mock-session-123");
        assert_eq!(sessao.participantes.len(), 2);

        let token = block_on(service.gerar_token(&sessao.session_id)).unwrap();
        assert_eq!((token.token.as_str(), token.expires_in), ("novo-token-video-123", 3600));

        let gravacao = block_on(service.gravar_sessao(&sessao.session_id, true)).unwrap();
        assert!(gravacao.recording);
        assert!(gravacao.start_time.is_some());

        block_on(service.encerrar_sessao(&sessao.session_id)).unwrap();
    }
}
