use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estatisticas {
    pub total_pacientes: u64,
    pub consultas_hoje: u64,
    pub teleconsultas: u64,
    /// Percentage, 0-100
    pub taxa_ocupacao: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoPonto {
    pub data: String,
    pub presencial: u64,
    pub telemedicina: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultasPorPeriodo {
    pub data_inicio: String,
    pub data_fim: String,
    #[serde(default)]
    pub pontos: Vec<PeriodoPonto>,
}

impl ConsultasPorPeriodo {
    pub fn total(&self) -> u64 {
        self.pontos
            .iter()
            .map(|p| p.presencial + p.telemedicina)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicadorValor {
    pub nome: String,
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicadores {
    #[serde(default)]
    pub consultas_por_tipo: Vec<IndicadorValor>,
    /// Median waiting time per month, in minutes
    #[serde(default)]
    pub tempo_espera_mediana: Vec<IndicadorValor>,
}
