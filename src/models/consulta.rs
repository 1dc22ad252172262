use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultaTipo {
    Presencial,
    Telemedicina,
}

impl ConsultaTipo {
    pub fn label(&self) -> &'static str {
        match self {
            ConsultaTipo::Presencial => "Presencial",
            ConsultaTipo::Telemedicina => "Telemedicina",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "presencial" => Some(ConsultaTipo::Presencial),
            "telemedicina" => Some(ConsultaTipo::Telemedicina),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultaStatus {
    Agendada,
    Confirmada,
    Cancelada,
    Concluida,
}

impl ConsultaStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConsultaStatus::Agendada => "Agendada",
            ConsultaStatus::Confirmada => "Confirmada",
            ConsultaStatus::Cancelada => "Cancelada",
            ConsultaStatus::Concluida => "Concluída",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "agendada" => Some(ConsultaStatus::Agendada),
            "confirmada" => Some(ConsultaStatus::Confirmada),
            "cancelada" => Some(ConsultaStatus::Cancelada),
            "concluida" | "concluída" => Some(ConsultaStatus::Concluida),
            _ => None,
        }
    }

    /// Cancelled and concluded appointments can no longer change.
    pub fn is_open(&self) -> bool {
        matches!(self, ConsultaStatus::Agendada | ConsultaStatus::Confirmada)
    }
}

impl fmt::Display for ConsultaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Backends answer "Agendada" as well as "agendada"
impl<'de> Deserialize<'de> for ConsultaTipo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ConsultaTipo::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown consulta tipo: {}", raw)))
    }
}

impl<'de> Deserialize<'de> for ConsultaStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ConsultaStatus::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown consulta status: {}", raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consulta {
    pub id: u64,
    pub paciente: String,
    pub medico: String,
    pub data: String,
    pub hora: String,
    pub status: ConsultaStatus,
    pub tipo: ConsultaTipo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovaConsulta {
    pub paciente: String,
    pub medico: String,
    pub data: String,
    pub hora: String,
    pub tipo: ConsultaTipo,
}

impl NovaConsulta {
    pub fn into_consulta(self, id: u64) -> Consulta {
        Consulta {
            id,
            paciente: self.paciente,
            medico: self.medico,
            data: self.data,
            hora: self.hora,
            status: ConsultaStatus::Agendada,
            tipo: self.tipo,
        }
    }
}

/// Filters accepted by `GET /consultas`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsultaFiltro {
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
    pub status: Option<ConsultaStatus>,
    pub paciente_id: Option<u64>,
    pub profissional_id: Option<u64>,
}

impl ConsultaFiltro {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(inicio) = &self.data_inicio {
            query.push(("dataInicio", inicio.clone()));
        }
        if let Some(fim) = &self.data_fim {
            query.push(("dataFim", fim.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status_param(status)));
        }
        if let Some(id) = self.paciente_id {
            query.push(("pacienteId", id.to_string()));
        }
        if let Some(id) = self.profissional_id {
            query.push(("profissionalId", id.to_string()));
        }
        query
    }
}

fn status_param(status: ConsultaStatus) -> String {
    match status {
        ConsultaStatus::Agendada => "agendada",
        ConsultaStatus::Confirmada => "confirmada",
        ConsultaStatus::Cancelada => "cancelada",
        ConsultaStatus::Concluida => "concluida",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_capitalised_fixture_values() {
        let consulta: Consulta = serde_json::from_str(
            r#"{"id":1,"paciente":"João Silva","medico":"Dr. Paulo Santos","data":"2023-12-01","hora":"14:00","status":"Agendada","tipo":"Presencial"}"#,
        )
        .unwrap();
        assert_eq!(consulta.status, ConsultaStatus::Agendada);
        assert_eq!(consulta.tipo, ConsultaTipo::Presencial);
        assert!(consulta.status.is_open());
    }

    #[test]
    fn filter_only_emits_set_fields() {
        let filtro = ConsultaFiltro {
            data_inicio: Some("2024-01-01".into()),
            status: Some(ConsultaStatus::Concluida),
            ..Default::default()
        };
        assert_eq!(
            filtro.to_query(),
            vec![
                ("dataInicio", "2024-01-01".to_string()),
                ("status", "concluida".to_string())
            ]
        );
    }
}
