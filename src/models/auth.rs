use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Staff role. Lower-case on the wire; decoding ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Medico,
    Enfermeiro,
    Atendente,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Medico => "medico",
            Role::Enfermeiro => "enfermeiro",
            Role::Atendente => "atendente",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Medico => "Médico",
            Role::Enfermeiro => "Enfermeiro",
            Role::Atendente => "Atendente",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "medico" => Ok(Role::Medico),
            "enfermeiro" => Ok(Role::Enfermeiro),
            "atendente" => Ok(Role::Atendente),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Profile of the signed-in staff member, as stored under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: Role,
}

/// Identity plus bearer credential for the lifetime of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.user.name
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session::new(response.user, response.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_uses_portuguese_wire_names() {
        let user: User = serde_json::from_str(
            r#"{"id":1,"nome":"Dr. Teste","email":"teste@hospital.com","tipo":"MEDICO"}"#,
        )
        .unwrap();
        assert_eq!(user.name, "Dr. Teste");
        assert_eq!(user.role, Role::Medico);

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["tipo"], "medico");
        assert_eq!(json["nome"], "Dr. Teste");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_str::<User>(
            r#"{"id":1,"nome":"X","email":"x@y.com","tipo":"paciente"}"#,
        );
        assert!(result.is_err());
    }
}
