use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paciente {
    pub id: u64,
    pub nome: String,
    pub cpf: String,
    #[serde(default)]
    pub email: String,
    pub telefone: String,
    #[serde(default)]
    pub data_nascimento: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
}

/// Payload for creating or updating a patient, including the LGPD consent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoPaciente {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub telefone: String,
    #[serde(default)]
    pub data_nascimento: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    pub termo_privacidade: bool,
    pub autoriza_compartilhamento: bool,
    pub dados_sensiveis: Vec<String>,
}

impl NovoPaciente {
    pub fn into_paciente(self, id: u64) -> Paciente {
        Paciente {
            id,
            nome: self.nome,
            cpf: self.cpf,
            email: self.email,
            telefone: self.telefone,
            data_nascimento: self.data_nascimento,
            endereco: self.endereco,
        }
    }
}

/// Server-side list filters for `GET /pacientes`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacienteFiltro {
    pub busca: Option<String>,
    pub pagina: Option<u32>,
}

impl PacienteFiltro {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(busca) = self.busca.as_ref().filter(|b| !b.trim().is_empty()) {
            query.push(("busca", busca.trim().to_string()));
        }
        if let Some(pagina) = self.pagina {
            query.push(("pagina", pagina.to_string()));
        }
        query
    }
}
