use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prontuario {
    pub id: u64,
    pub paciente_id: u64,
    #[serde(default)]
    pub historico_medico: String,
    #[serde(default)]
    pub alergias: Vec<String>,
    #[serde(default)]
    pub anotacoes: Vec<Anotacao>,
    #[serde(default)]
    pub exames: Vec<Exame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anotacao {
    pub tipo: String,
    pub descricao: String,
    pub data: String,
    pub profissional_id: u64,
}

pub type NovaAnotacao = Anotacao;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exame {
    pub tipo: String,
    pub resultado: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arquivo_url: Option<String>,
    pub profissional_id: u64,
}

pub type NovoExame = Exame;
