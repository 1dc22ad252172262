// ============================================================================
// FORMS - Client-side validation for the patient and appointment dialogs
// ============================================================================
// A form that fails validation never reaches the network.
// ============================================================================

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ConsultaTipo, NovaConsulta, NovoPaciente, Paciente};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// Sensitive-data categories a patient can authorise
pub const DADOS_SENSIVEIS: [(&str, &str); 2] = [
    ("historico_medico", "Histórico Médico"),
    ("exames", "Resultados de Exames"),
];

/// Field name -> message, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacienteForm {
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
    pub data_nascimento: String,
    pub endereco: String,
    pub termo_privacidade: bool,
    pub autoriza_compartilhamento: bool,
    pub dados_sensiveis: Vec<String>,
}

impl PacienteForm {
    /// Prefills the edit dialog. Consents are not echoed by the API and
    /// have to be given again.
    pub fn from_paciente(paciente: &Paciente) -> Self {
        Self {
            nome: paciente.nome.clone(),
            cpf: paciente.cpf.clone(),
            telefone: paciente.telefone.clone(),
            email: paciente.email.clone(),
            data_nascimento: paciente.data_nascimento.clone(),
            endereco: paciente.endereco.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn toggle_dado_sensivel(&mut self, categoria: &str) {
        match self.dados_sensiveis.iter().position(|c| c == categoria) {
            Some(index) => {
                self.dados_sensiveis.remove(index);
            }
            None => self.dados_sensiveis.push(categoria.to_string()),
        }
    }

    pub fn validate(&self) -> Result<NovoPaciente, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        required(&mut errors, "nome", &self.nome, "Nome é obrigatório");
        required(&mut errors, "cpf", &self.cpf, "CPF é obrigatório");
        required(&mut errors, "telefone", &self.telefone, "Telefone é obrigatório");
        required(&mut errors, "email", &self.email, "Email é obrigatório");
        if !self.email.trim().is_empty() && !is_valid_email(&self.email) {
            errors.add("email", "Email inválido");
        }
        if !self.termo_privacidade {
            errors.add("termoPrivacidade", "É necessário aceitar os termos de privacidade");
        }
        if self.dados_sensiveis.is_empty() {
            errors.add("dadosSensiveis", "Selecione pelo menos um tipo de dado sensível");
        }

        let endereco = self.endereco.trim();
        errors.into_result(NovoPaciente {
            nome: self.nome.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
            email: self.email.trim().to_string(),
            telefone: self.telefone.trim().to_string(),
            data_nascimento: self.data_nascimento.trim().to_string(),
            endereco: (!endereco.is_empty()).then(|| endereco.to_string()),
            termo_privacidade: self.termo_privacidade,
            autoriza_compartilhamento: self.autoriza_compartilhamento,
            dados_sensiveis: self.dados_sensiveis.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsultaForm {
    pub paciente: String,
    pub medico: String,
    pub data: String,
    pub hora: String,
    /// Raw select value, `presencial` or `telemedicina`
    pub tipo: String,
}

impl ConsultaForm {
    pub fn validate(&self) -> Result<NovaConsulta, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        required(&mut errors, "paciente", &self.paciente, "Paciente é obrigatório");
        required(&mut errors, "medico", &self.medico, "Médico é obrigatório");
        required(&mut errors, "data", &self.data, "Data é obrigatória");
        required(&mut errors, "hora", &self.hora, "Hora é obrigatória");

        let tipo = ConsultaTipo::parse(&self.tipo);
        if tipo.is_none() {
            errors.add("tipo", "Tipo é obrigatório");
        }

        match tipo {
            Some(tipo) if errors.is_empty() => Ok(NovaConsulta {
                paciente: self.paciente.trim().to_string(),
                medico: self.medico.trim().to_string(),
                data: self.data.trim().to_string(),
                hora: self.hora.trim().to_string(),
                tipo,
            }),
            _ => Err(errors),
        }
    }
}
