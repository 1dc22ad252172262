// ============================================================================
// TELEMEDICINA VIEWMODEL - Video call session state machine
// ============================================================================
// Inativa -> Iniciando -> Ativa -> Inativa. Media controls are local flags;
// recording and the session itself live on the server. A session that opens
// after the screen was left is ended right away.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::models::SessaoTelemedicina;
use crate::services::ApiError;
use crate::state::{AppState, ReactiveState};

#[derive(Debug, Clone, PartialEq)]
pub struct ChamadaAtiva {
    pub consulta_id: u64,
    pub sessao: SessaoTelemedicina,
    pub token: String,
    pub microfone: bool,
    pub camera: bool,
    pub compartilhando_tela: bool,
    pub gravando: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EstadoChamada {
    #[default]
    Inativa,
    Iniciando(u64),
    Ativa(ChamadaAtiva),
}

#[derive(Clone)]
pub struct TelemedicinaViewModel {
    app: AppState,
    pub estado: ReactiveState<EstadoChamada>,
    ativo: Rc<Cell<bool>>,
}

impl TelemedicinaViewModel {
    pub fn new(app: &AppState) -> Self {
        Self {
            app: app.clone(),
            estado: ReactiveState::default(),
            ativo: Rc::new(Cell::new(true)),
        }
    }

    pub fn ativa(&self) -> Option<ChamadaAtiva> {
        match self.estado.get() {
            EstadoChamada::Ativa(chamada) => Some(chamada),
            _ => None,
        }
    }

    pub async fn iniciar(&self, consulta_id: u64) -> Result<(), ApiError> {
        if !matches!(self.estado.get(), EstadoChamada::Inativa) {
            log::warn!("⚠️ A call is already open, ignoring start for consulta {}", consulta_id);
            return Ok(());
        }
        self.estado.set(EstadoChamada::Iniciando(consulta_id));

        let result = self.app.telemedicina.iniciar_sessao(consulta_id).await;
        if !self.ativo.get() {
            if let Ok(sessao) = &result {
                log::info!("📴 Screen closed while connecting, ending session {}", sessao.session_id);
                if let Err(e) = self.app.telemedicina.encerrar_sessao(&sessao.session_id).await {
                    log::warn!("⚠️ Could not close session {}: {}", sessao.session_id, e);
                }
            }
            return result.map(|_| ());
        }

        match result {
            Ok(sessao) => {
                self.estado.set(EstadoChamada::Ativa(ChamadaAtiva {
                    consulta_id,
                    token: sessao.token.clone(),
                    sessao,
                    microfone: true,
                    camera: true,
                    compartilhando_tela: false,
                    gravando: false,
                }));
                Ok(())
            }
            Err(e) => {
                self.estado.set(EstadoChamada::Inativa);
                if !e.is_auth_expired() {
                    self.app
                        .notifications
                        .error("Não foi possível iniciar a videochamada");
                }
                Err(e)
            }
        }
    }

    pub fn alternar_microfone(&self) {
        if let Some(ligado) = self.alternar(|c| &mut c.microfone) {
            self.app
                .notifications
                .info(if ligado { "Microfone ativado" } else { "Microfone desativado" });
        }
    }

    pub fn alternar_camera(&self) {
        if let Some(ligada) = self.alternar(|c| &mut c.camera) {
            self.app
                .notifications
                .info(if ligada { "Câmera ativada" } else { "Câmera desativada" });
        }
    }

    pub fn alternar_compartilhamento(&self) {
        if let Some(ativo) = self.alternar(|c| &mut c.compartilhando_tela) {
            self.app.notifications.info(if ativo {
                "Compartilhamento de tela iniciado"
            } else {
                "Compartilhamento encerrado"
            });
        }
    }

    pub async fn alternar_gravacao(&self) -> Result<(), ApiError> {
        let chamada = match self.ativa() {
            Some(chamada) => chamada,
            None => return Ok(()),
        };

        match self
            .app
            .telemedicina
            .gravar_sessao(&chamada.sessao.session_id, !chamada.gravando)
            .await
        {
            Ok(status) => {
                self.editar(|c| c.gravando = status.recording);
                self.app.notifications.info(if status.recording {
                    "Gravação iniciada"
                } else {
                    "Gravação encerrada"
                });
                Ok(())
            }
            Err(e) => {
                if !e.is_auth_expired() {
                    self.app.notifications.error("Erro ao controlar gravação");
                }
                Err(e)
            }
        }
    }

    pub async fn renovar_token(&self) -> Result<(), ApiError> {
        let chamada = match self.ativa() {
            Some(chamada) => chamada,
            None => return Ok(()),
        };
        let novo = self
            .app
            .telemedicina
            .gerar_token(&chamada.sessao.session_id)
            .await?;
        log::info!("🔑 Video token renewed, valid for {}s", novo.expires_in);
        self.editar(|c| c.token = novo.token);
        Ok(())
    }

    /// Ends the call on the server; on failure the call stays open.
    pub async fn encerrar(&self) -> Result<(), ApiError> {
        let chamada = match self.ativa() {
            Some(chamada) => chamada,
            None => return Ok(()),
        };
        match self
            .app
            .telemedicina
            .encerrar_sessao(&chamada.sessao.session_id)
            .await
        {
            Ok(()) => {
                self.estado.set(EstadoChamada::Inativa);
                Ok(())
            }
            Err(e) => {
                if !e.is_auth_expired() {
                    self.app.notifications.error("Erro ao encerrar chamada");
                }
                Err(e)
            }
        }
    }

    /// Leaving the screen: close any open call, ignoring server errors. A
    /// start still in flight is closed when it completes.
    pub async fn sair(&self) {
        self.ativo.set(false);
        if let Some(chamada) = self.ativa() {
            self.estado.set(EstadoChamada::Inativa);
            if let Err(e) = self
                .app
                .telemedicina
                .encerrar_sessao(&chamada.sessao.session_id)
                .await
            {
                log::warn!("⚠️ Could not close session {}: {}", chamada.sessao.session_id, e);
            }
        }
    }

    fn editar(&self, change: impl FnOnce(&mut ChamadaAtiva)) {
        self.estado.update(|estado| {
            if let EstadoChamada::Ativa(chamada) = estado {
                change(chamada);
            }
        });
    }

    /// Flips one flag of the active call and returns its new value.
    fn alternar(&self, flag: impl Fn(&mut ChamadaAtiva) -> &mut bool) -> Option<bool> {
        self.ativa()?;
        let mut novo = false;
        self.editar(|chamada| {
            let valor = flag(chamada);
            *valor = !*valor;
            novo = *valor;
        });
        Some(novo)
    }
}
