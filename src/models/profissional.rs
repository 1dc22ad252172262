use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profissional {
    pub id: u64,
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coren: Option<String>,
    pub especialidade: String,
    #[serde(default)]
    pub tipo: Option<String>,
}

impl Profissional {
    /// CRM for doctors, COREN for nurses
    pub fn registro(&self) -> Option<&str> {
        self.crm.as_deref().or(self.coren.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaSlot {
    pub hora: String,
    pub disponivel: bool,
}
