// ============================================================================
// MOCK TRANSPORT - In-memory backend used in development and tests
// ============================================================================
// Answers the REST routes from fixtures kept in memory, so list/create/update
// flows behave like the real API. Only login is public; every other route
// wants `Authorization: Bearer mock-jwt-token`.
// ============================================================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};

use crate::models::{
    Consulta, ConsultaStatus, ConsultaTipo, LoginRequest, NovaConsulta, NovoPaciente, Paciente,
    Profissional, Role, User,
};
use crate::services::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

pub const MOCK_EMAIL: &str = "teste@vidaplus.com";
pub const MOCK_PASSWORD: &str = "123456";
pub const MOCK_TOKEN: &str = "mock-jwt-token";

const RESOURCES: [&str; 6] = [
    "auth",
    "pacientes",
    "consultas",
    "profissionais",
    "telemedicina",
    "dashboard",
];

/// Injected failure for the next request
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// Answer with this status and raw body
    Status(u16, String),
    Network,
    Timeout,
}

struct Backend {
    pacientes: Vec<Paciente>,
    consultas: Vec<Consulta>,
    profissionais: Vec<Profissional>,
    failures: VecDeque<MockFailure>,
    gates: VecDeque<oneshot::Receiver<()>>,
    requests: Vec<HttpRequest>,
}

#[derive(Clone)]
pub struct MockTransport {
    backend: Rc<RefCell<Backend>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            backend: Rc::new(RefCell::new(Backend {
                pacientes: fixture_pacientes(),
                consultas: fixture_consultas(),
                profissionais: fixture_profissionais(),
                failures: VecDeque::new(),
                gates: VecDeque::new(),
                requests: Vec::new(),
            })),
        }
    }

    /// Queues a failure; queued failures are consumed one per request.
    pub fn fail_next(&self, failure: MockFailure) {
        self.backend.borrow_mut().failures.push_back(failure);
    }

    /// Holds the next request until the returned sender fires (or is dropped).
    /// Queued failures are picked once the request is released.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.backend.borrow_mut().gates.push_back(gate);
        release
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.backend.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.backend.borrow().requests.last().cloned()
    }

    pub fn pacientes(&self) -> Vec<Paciente> {
        self.backend.borrow().pacientes.clone()
    }

    pub fn consultas(&self) -> Vec<Consulta> {
        self.backend.borrow().consultas.clone()
    }

    fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = url::Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", request.url, e)))?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        let start = segments
            .iter()
            .position(|segment| RESOURCES.contains(segment))
            .unwrap_or(segments.len());
        let route = &segments[start..];
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let param = |name: &str| {
            query
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };

        if route == ["auth", "login"] && request.method == Method::Post {
            return Ok(login(request.body.as_deref()));
        }

        let authorized = request
            .header("Authorization")
            .map_or(false, |value| value == format!("Bearer {}", MOCK_TOKEN));
        if !authorized {
            return Ok(HttpResponse::json(401, &json!({ "message": "Token inválido ou expirado" })));
        }

        let body = request.body.as_deref().unwrap_or("");
        let mut backend = self.backend.borrow_mut();

        let response = match (request.method, route) {
            (Method::Post, ["auth", "logout"]) => HttpResponse::new(204, ""),
            (Method::Get, ["auth", "verify"]) => {
                HttpResponse::json(200, &json!({ "valid": true, "user": mock_user() }))
            }

            (Method::Get, ["pacientes"]) => {
                let busca = param("busca").map(|b| b.to_lowercase());
                let list: Vec<&Paciente> = backend
                    .pacientes
                    .iter()
                    .filter(|p| {
                        busca
                            .as_ref()
                            .map_or(true, |b| p.nome.to_lowercase().contains(b.as_str()))
                    })
                    .collect();
                ok(&list)
            }
            (Method::Post, ["pacientes"]) => match serde_json::from_str::<NovoPaciente>(body) {
                Ok(novo) => {
                    let id = backend.pacientes.iter().map(|p| p.id).max().unwrap_or(0) + 1;
                    let paciente = novo.into_paciente(id);
                    backend.pacientes.push(paciente.clone());
                    HttpResponse::json(201, &to_json(&paciente))
                }
                Err(e) => bad_request(&e.to_string()),
            },
            (method, ["pacientes", id]) => match id.parse::<u64>() {
                Ok(id) => pacientes_by_id(&mut backend, method, id, body),
                Err(_) => not_found("Paciente não encontrado"),
            },
            (Method::Get, ["pacientes", id, "prontuario"]) => match id.parse::<u64>() {
                Ok(id) if backend.pacientes.iter().any(|p| p.id == id) => ok(&json!({
                    "id": id,
                    "pacienteId": id,
                    "historicoMedico": "Hipertensão controlada",
                    "alergias": ["Dipirona"],
                    "anotacoes": [],
                    "exames": []
                })),
                _ => not_found("Prontuário não encontrado"),
            },
            (Method::Post, ["pacientes", _, "prontuario", "anotacoes"])
            | (Method::Post, ["pacientes", _, "prontuario", "exames"]) => {
                match serde_json::from_str::<Value>(body) {
                    Ok(value) => HttpResponse::json(201, &value),
                    Err(e) => bad_request(&e.to_string()),
                }
            }

            (Method::Get, ["consultas"]) => {
                let status = param("status").and_then(|s| ConsultaStatus::parse(&s));
                let list: Vec<&Consulta> = backend
                    .consultas
                    .iter()
                    .filter(|c| status.map_or(true, |s| c.status == s))
                    .collect();
                ok(&list)
            }
            (Method::Post, ["consultas"]) => match serde_json::from_str::<NovaConsulta>(body) {
                Ok(nova) => {
                    let id = backend.consultas.iter().map(|c| c.id).max().unwrap_or(0) + 1;
                    let consulta = nova.into_consulta(id);
                    backend.consultas.push(consulta.clone());
                    HttpResponse::json(201, &to_json(&consulta))
                }
                Err(e) => bad_request(&e.to_string()),
            },
            (Method::Get, ["consultas", id]) => {
                match find_consulta(&mut backend, id) {
                    Some(consulta) => ok(consulta),
                    None => not_found("Consulta não encontrada"),
                }
            }
            (Method::Put, ["consultas", id]) => match serde_json::from_str::<NovaConsulta>(body) {
                Ok(nova) => match find_consulta(&mut backend, id) {
                    Some(consulta) => {
                        let status = consulta.status;
                        *consulta = nova.into_consulta(consulta.id);
                        consulta.status = status;
                        ok(consulta)
                    }
                    None => not_found("Consulta não encontrada"),
                },
                Err(e) => bad_request(&e.to_string()),
            },
            (Method::Patch, ["consultas", id, action @ ("cancelar" | "concluir")]) => {
                match find_consulta(&mut backend, id) {
                    Some(consulta) if !consulta.status.is_open() => HttpResponse::json(
                        409,
                        &json!({ "message": "Consulta já encerrada" }),
                    ),
                    Some(consulta) => {
                        consulta.status = if *action == "cancelar" {
                            ConsultaStatus::Cancelada
                        } else {
                            ConsultaStatus::Concluida
                        };
                        ok(consulta)
                    }
                    None => not_found("Consulta não encontrada"),
                }
            }

            (Method::Get, ["profissionais"]) => {
                let especialidade = param("especialidade").map(|e| e.to_lowercase());
                let list: Vec<&Profissional> = backend
                    .profissionais
                    .iter()
                    .filter(|p| {
                        especialidade
                            .as_ref()
                            .map_or(true, |e| p.especialidade.to_lowercase() == *e)
                    })
                    .collect();
                ok(&list)
            }
            (Method::Get, ["profissionais", id]) => {
                match backend.profissionais.iter().find(|p| p.id.to_string() == *id) {
                    Some(profissional) => ok(profissional),
                    None => not_found("Profissional não encontrado"),
                }
            }
            (Method::Get, ["profissionais", _, "agenda"]) => ok(&json!([
                { "hora": "08:00", "disponivel": true },
                { "hora": "09:00", "disponivel": false },
                { "hora": "10:00", "disponivel": true }
            ])),

            (Method::Post, ["telemedicina", "sessao", _, "iniciar"]) => ok(&json!({
                "sessionId": "mock-session-123",
                "token": "mock-video-token",
                "roomName": "consulta-virtual-1",
                "participantes": [
                    { "id": 1, "nome": "Dr. Paulo Santos", "tipo": "medico" },
                    { "id": 2, "nome": "João Silva", "tipo": "paciente" }
                ]
            })),
            (Method::Post, ["telemedicina", "sessao", _, "encerrar"]) => ok(&json!({
                "success": true,
                "message": "Sessão encerrada com sucesso"
            })),
            (Method::Get, ["telemedicina", "sessao", _, "token"]) => ok(&json!({
                "token": "novo-token-video-123",
                "expiresIn": 3600
            })),
            (Method::Patch, ["telemedicina", "sessao", _, "gravacao"]) => {
                let enabled = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("gravarEnabled").and_then(Value::as_bool))
                    .unwrap_or(true);
                let start_time = enabled.then(|| chrono::Utc::now().to_rfc3339());
                ok(&json!({ "recording": enabled, "startTime": start_time }))
            }

            (Method::Get, ["dashboard", "estatisticas"]) => ok(&json!({
                "totalPacientes": 150,
                "consultasHoje": 12,
                "teleconsultas": 5,
                "taxaOcupacao": 75
            })),
            (Method::Get, ["dashboard", "consultas-por-periodo"]) => ok(&json!({
                "dataInicio": param("dataInicio").unwrap_or_default(),
                "dataFim": param("dataFim").unwrap_or_default(),
                "pontos": [
                    { "data": "Seg", "presencial": 4, "telemedicina": 2 },
                    { "data": "Ter", "presencial": 3, "telemedicina": 4 },
                    { "data": "Qua", "presencial": 5, "telemedicina": 1 },
                    { "data": "Qui", "presencial": 2, "telemedicina": 3 },
                    { "data": "Sex", "presencial": 6, "telemedicina": 2 }
                ]
            })),
            (Method::Get, ["dashboard", "indicadores"]) => ok(&json!({
                "consultasPorTipo": [
                    { "nome": "Presencial", "valor": 65 },
                    { "nome": "Telemedicina", "valor": 35 }
                ],
                "tempoEsperaMediana": [
                    { "nome": "Clínica Geral", "valor": 12 },
                    { "nome": "Cardiologia", "valor": 18 }
                ]
            })),

            _ => not_found("Rota não encontrada"),
        };
        Ok(response)
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        log::debug!("🧪 Mock {} {}", request.method, request.url);
        let gate = {
            let mut backend = self.backend.borrow_mut();
            backend.requests.push(request.clone());
            backend.gates.pop_front()
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let failure = self.backend.borrow_mut().failures.pop_front();

        match failure {
            Some(MockFailure::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(MockFailure::Network) => {
                Err(TransportError::Network("connection refused".to_string()))
            }
            Some(MockFailure::Timeout) => Err(TransportError::Timeout(request.timeout_ms)),
            None => self.handle(&request),
        }
    }
}

fn login(body: Option<&str>) -> HttpResponse {
    let credentials = body.and_then(|b| serde_json::from_str::<LoginRequest>(b).ok());
    match credentials {
        Some(c) if c.email == MOCK_EMAIL && c.senha == MOCK_PASSWORD => HttpResponse::json(
            200,
            &json!({ "token": MOCK_TOKEN, "user": to_json(&mock_user()) }),
        ),
        _ => HttpResponse::new(401, ""),
    }
}

fn pacientes_by_id(backend: &mut Backend, method: Method, id: u64, body: &str) -> HttpResponse {
    let position = match backend.pacientes.iter().position(|p| p.id == id) {
        Some(position) => position,
        None => return not_found("Paciente não encontrado"),
    };

    match method {
        Method::Get => ok(&backend.pacientes[position]),
        Method::Put => match serde_json::from_str::<NovoPaciente>(body) {
            Ok(novo) => {
                backend.pacientes[position] = novo.into_paciente(id);
                ok(&backend.pacientes[position])
            }
            Err(e) => bad_request(&e.to_string()),
        },
        Method::Delete => {
            backend.pacientes.remove(position);
            HttpResponse::new(204, "")
        }
        _ => not_found("Rota não encontrada"),
    }
}

fn find_consulta<'a>(backend: &'a mut Backend, id: &str) -> Option<&'a mut Consulta> {
    let id = id.parse::<u64>().ok()?;
    backend.consultas.iter_mut().find(|c| c.id == id)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn ok<T: serde::Serialize + ?Sized>(value: &T) -> HttpResponse {
    HttpResponse::json(200, &to_json(value))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::json(404, &json!({ "message": message }))
}

fn bad_request(reason: &str) -> HttpResponse {
    HttpResponse::json(400, &json!({ "message": "Dados inválidos", "details": reason }))
}

pub fn mock_user() -> User {
    User {
        id: 1,
        name: "Administrador".to_string(),
        email: MOCK_EMAIL.to_string(),
        role: Role::Admin,
    }
}

fn fixture_pacientes() -> Vec<Paciente> {
    vec![
        Paciente {
            id: 1,
            nome: "João Silva".into(),
            cpf: "123.456.789-00".into(),
            email: "joao@email.com".into(),
            telefone: "(41) 99999-9999".into(),
            data_nascimento: "1985-03-12".into(),
            endereco: None,
        },
        Paciente {
            id: 2,
            nome: "Maria Santos".into(),
            cpf: "987.654.321-00".into(),
            email: "maria@email.com".into(),
            telefone: "(41) 88888-8888".into(),
            data_nascimento: "1990-07-25".into(),
            endereco: None,
        },
    ]
}

fn fixture_consultas() -> Vec<Consulta> {
    vec![
        Consulta {
            id: 1,
            paciente: "João Silva".into(),
            medico: "Dr. Paulo Santos".into(),
            data: "2023-12-01".into(),
            hora: "14:00".into(),
            status: ConsultaStatus::Agendada,
            tipo: ConsultaTipo::Presencial,
        },
        Consulta {
            id: 2,
            paciente: "Maria Santos".into(),
            medico: "Dra. Ana Lima".into(),
            data: "2023-12-02".into(),
            hora: "10:30".into(),
            status: ConsultaStatus::Confirmada,
            tipo: ConsultaTipo::Telemedicina,
        },
    ]
}

fn fixture_profissionais() -> Vec<Profissional> {
    vec![
        Profissional {
            id: 1,
            nome: "Dr. Paulo Santos".into(),
            crm: Some("CRM/PR 12345".into()),
            coren: None,
            especialidade: "Cardiologia".into(),
            tipo: Some("medico".into()),
        },
        Profissional {
            id: 2,
            nome: "Dra. Ana Lima".into(),
            crm: Some("CRM/PR 54321".into()),
            coren: None,
            especialidade: "Clínica Geral".into(),
            tipo: Some("medico".into()),
        },
        Profissional {
            id: 3,
            nome: "Carla Mendes".into(),
            crm: None,
            coren: Some("COREN/PR 998877".into()),
            especialidade: "Enfermagem".into(),
            tipo: Some("enfermeiro".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn request(method: Method, path: &str, body: Option<&str>, authorized: bool) -> HttpRequest {
        let mut headers = Vec::new();
        if authorized {
            headers.push(("Authorization".to_string(), format!("Bearer {}", MOCK_TOKEN)));
        }
        HttpRequest {
            method,
            url: format!("http://localhost:3000/api{}", path),
            headers,
            body: body.map(str::to_string),
            timeout_ms: 10_000,
        }
    }

    #[test]
    fn login_fixture_accepts_only_the_documented_pair() {
        let transport = MockTransport::new();
        let good = r#"{"email":"teste@vidaplus.com","senha":"123456"}"#;
        let response =
            block_on(transport.send(request(Method::Post, "/auth/login", Some(good), false)))
                .unwrap();
        assert_eq!(response.status, 200);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["token"], "mock-jwt-token");
        assert_eq!(body["user"]["tipo"], "admin");

        let bad = r#"{"email":"teste@vidaplus.com","senha":"errada"}"#;
        let response =
            block_on(transport.send(request(Method::Post, "/auth/login", Some(bad), false)))
                .unwrap();
        assert_eq!(response.status, 401);
        assert!(response.body.is_empty());
    }

    #[test]
    fn protected_routes_need_the_bearer_token() {
        let transport = MockTransport::new();
        let response =
            block_on(transport.send(request(Method::Get, "/consultas", None, false))).unwrap();
        assert_eq!(response.status, 401);

        let response =
            block_on(transport.send(request(Method::Get, "/consultas", None, true))).unwrap();
        let consultas: Vec<Consulta> = serde_json::from_str(&response.body).unwrap();
        assert_eq!(consultas.len(), 2);
        assert_eq!(consultas[1].tipo, ConsultaTipo::Telemedicina);
    }

    #[test]
    fn cancelling_twice_conflicts() {
        let transport = MockTransport::new();
        let cancel = request(Method::Patch, "/consultas/1/cancelar", Some("{}"), true);
        assert_eq!(block_on(transport.send(cancel.clone())).unwrap().status, 200);
        assert_eq!(block_on(transport.send(cancel)).unwrap().status, 409);
        assert_eq!(transport.consultas()[0].status, ConsultaStatus::Cancelada);
    }

    #[test]
    fn injected_failures_are_consumed_in_order() {
        let transport = MockTransport::new();
        transport.fail_next(MockFailure::Status(500, String::new()));
        transport.fail_next(MockFailure::Network);

        let first = block_on(transport.send(request(Method::Get, "/pacientes", None, true)));
        assert_eq!(first.unwrap().status, 500);
        let second = block_on(transport.send(request(Method::Get, "/pacientes", None, true)));
        assert!(matches!(second, Err(TransportError::Network(_))));
        let third = block_on(transport.send(request(Method::Get, "/pacientes", None, true)));
        assert_eq!(third.unwrap().status, 200);
        assert_eq!(transport.requests().len(), 3);
    }
}
