use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participante {
    pub id: u64,
    pub nome: String,
    pub tipo: String,
}

/// Answer of `POST /telemedicina/sessao/{consultaId}/iniciar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessaoTelemedicina {
    pub session_id: String,
    pub token: String,
    pub room_name: String,
    #[serde(default)]
    pub participantes: Vec<Participante>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVideo {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravacaoStatus {
    pub recording: bool,
    #[serde(default)]
    pub start_time: Option<String>,
}
