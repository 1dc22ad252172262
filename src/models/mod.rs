pub mod auth;
pub mod paciente;
pub mod consulta;
pub mod profissional;
pub mod prontuario;
pub mod telemedicina;
pub mod dashboard;

pub use auth::{LoginRequest, LoginResponse, Role, Session, User};
pub use paciente::{NovoPaciente, Paciente, PacienteFiltro};
pub use consulta::{Consulta, ConsultaFiltro, ConsultaStatus, ConsultaTipo, NovaConsulta};
pub use profissional::{AgendaSlot, Profissional};
pub use prontuario::{Anotacao, Exame, NovaAnotacao, NovoExame, Prontuario};
pub use telemedicina::{GravacaoStatus, Participante, SessaoTelemedicina, TokenVideo};
pub use dashboard::{ConsultasPorPeriodo, Estatisticas, IndicadorValor, Indicadores, PeriodoPonto};
