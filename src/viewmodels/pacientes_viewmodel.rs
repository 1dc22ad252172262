// ============================================================================
// PACIENTES VIEWMODEL - Searchable, sortable patient table + form dialog
// ============================================================================

use crate::models::{Paciente, PacienteFiltro};
use crate::services::ApiError;
use crate::state::{AppState, ReactiveState};
use crate::viewmodels::{error_message, FormError, PacienteForm, RequestState};

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrdenacaoPaciente {
    #[default]
    Nome,
    Cpf,
    Telefone,
}

impl OrdenacaoPaciente {
    fn chave<'a>(&self, paciente: &'a Paciente) -> &'a str {
        match self {
            OrdenacaoPaciente::Nome => &paciente.nome,
            OrdenacaoPaciente::Cpf => &paciente.cpf,
            OrdenacaoPaciente::Telefone => &paciente.telefone,
        }
    }
}

/// Name matches case-insensitively; CPF and phone match the raw text.
pub fn filtrar_e_ordenar(
    pacientes: &[Paciente],
    filtro: &str,
    ordenacao: OrdenacaoPaciente,
) -> Vec<Paciente> {
    let filtro = filtro.trim();
    let filtro_lower = filtro.to_lowercase();
    let mut visiveis: Vec<Paciente> = pacientes
        .iter()
        .filter(|p| {
            filtro.is_empty()
                || p.nome.to_lowercase().contains(&filtro_lower)
                || p.cpf.contains(filtro)
                || p.telefone.contains(filtro)
        })
        .cloned()
        .collect();
    visiveis.sort_by(|a, b| {
        ordenacao
            .chave(a)
            .to_lowercase()
            .cmp(&ordenacao.chave(b).to_lowercase())
    });
    visiveis
}

#[derive(Clone)]
pub struct PacientesViewModel {
    app: AppState,
    pub lista: RequestState<Vec<Paciente>>,
    pub filtro: ReactiveState<String>,
    pub ordenacao: ReactiveState<OrdenacaoPaciente>,
}

impl PacientesViewModel {
    pub fn new(app: &AppState) -> Self {
        Self {
            app: app.clone(),
            lista: RequestState::new(Some(Vec::new())),
            filtro: ReactiveState::new(String::new()),
            ordenacao: ReactiveState::default(),
        }
    }

    pub async fn carregar(&self) {
        let service = self.app.pacientes.clone();
        let result = self
            .lista
            .execute(async move { service.listar(&PacienteFiltro::default()).await })
            .await;
        if let Err(e) = result {
            self.notificar_erro("Erro ao carregar pacientes", &e);
        }
    }

    /// Rows after search and sort
    pub fn visiveis(&self) -> Vec<Paciente> {
        let pacientes = self.lista.data().unwrap_or_default();
        let filtro = self.filtro.get();
        filtrar_e_ordenar(&pacientes, &filtro, self.ordenacao.get())
    }

    /// Creates (`id == None`) or updates a patient.
    pub async fn salvar(&self, id: Option<u64>, form: &PacienteForm) -> Result<Paciente, FormError> {
        let novo = form.validate().map_err(FormError::Validation)?;

        let result = match id {
            Some(id) => self.app.pacientes.atualizar(id, &novo).await,
            None => self.app.pacientes.criar(&novo).await,
        };

        match result {
            Ok(paciente) => {
                let salvo = paciente.clone();
                self.alterar_lista(move |lista| match lista.iter_mut().find(|p| p.id == salvo.id) {
                    Some(existente) => *existente = salvo,
                    None => lista.push(salvo),
                });
                self.app.notifications.success("Paciente salvo com sucesso");
                Ok(paciente)
            }
            Err(e) => {
                self.notificar_erro("Erro ao salvar paciente", &e);
                Err(FormError::Api(e))
            }
        }
    }

    pub async fn excluir(&self, id: u64) -> Result<(), ApiError> {
        match self.app.pacientes.excluir(id).await {
            Ok(()) => {
                self.alterar_lista(move |lista| lista.retain(|p| p.id != id));
                self.app.notifications.success("Paciente excluído com sucesso");
                Ok(())
            }
            Err(e) => {
                self.notificar_erro("Erro ao excluir paciente", &e);
                Err(e)
            }
        }
    }

    pub fn dispose(&self) {
        self.lista.dispose();
    }

    fn alterar_lista(&self, change: impl FnOnce(&mut Vec<Paciente>)) {
        if !self.lista.is_alive() {
            return;
        }
        let mut lista = self.lista.data().unwrap_or_default();
        change(&mut lista);
        self.lista.set_data(Some(lista));
    }

    fn notificar_erro(&self, contexto: &str, error: &ApiError) {
        // The 401 path has already sent the user to the login screen
        if error.is_auth_expired() || !self.lista.is_alive() {
            return;
        }
        self.app
            .notifications
            .error(format!("{}: {}", contexto, error_message(error)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockFailure;
    use crate::viewmodels::testing::TestApp;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    fn form(nome: &str) -> PacienteForm {
        PacienteForm {
            nome: nome.into(),
            cpf: "555.666.777-88".into(),
            telefone: "(41) 95555-5555".into(),
            email: "bruno@email.com".into(),
            termo_privacidade: true,
            dados_sensiveis: vec!["historico_medico".into()],
            ..PacienteForm::default()
        }
    }

    #[test]
    fn search_matches_name_cpf_and_phone() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);
        block_on(vm.carregar());

        vm.filtro.set("maria".into());
        assert_eq!(vm.visiveis().len(), 1);
        vm.filtro.set("123.456".into());
        assert_eq!(vm.visiveis()[0].nome, "João Silva");
        vm.filtro.set("88888".into());
        assert_eq!(vm.visiveis()[0].nome, "Maria Santos");
        vm.filtro.set("ninguém".into());
        assert!(vm.visiveis().is_empty());
    }

    #[test]
    fn sorts_by_the_selected_column() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);
        block_on(vm.carregar());

        vm.ordenacao.set(OrdenacaoPaciente::Telefone);
        let nomes: Vec<String> = vm.visiveis().into_iter().map(|p| p.nome).collect();
        assert_eq!(nomes, vec!["Maria Santos", "João Silva"]);
    }

    #[test]
    fn saving_adds_the_row_and_confirms() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);
        block_on(vm.carregar());

        let criado = block_on(vm.salvar(None, &form("Bruno Alves"))).unwrap();

        assert_eq!(vm.visiveis()[0].id, criado.id);
        assert_eq!(t.snackbar(), Some("Paciente salvo com sucesso".into()));
    }

    #[test]
    fn invalid_form_is_not_sent() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);

        let error = block_on(vm.salvar(None, &form(""))).unwrap_err();

        assert!(matches!(error, FormError::Validation(ref e) if e.get("nome").is_some()));
        assert!(t.transport.requests().is_empty());
    }

    #[test]
    fn failures_reach_the_snackbar() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);
        t.transport.fail_next(MockFailure::Status(
            500,
            r#"{"message":"Banco indisponível"}"#.into(),
        ));

        block_on(vm.carregar());

        assert_eq!(t.snackbar(), Some("Erro ao carregar pacientes: Banco indisponível".into()));
        t.scheduler.advance(6_000);
        assert_eq!(t.snackbar(), None);
    }

    #[test]
    fn delete_removes_the_row() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);
        block_on(vm.carregar());

        block_on(vm.excluir(1)).unwrap();

        assert_eq!(vm.visiveis().len(), 1);
        assert_eq!(t.transport.pacientes().len(), 1);
    }

    #[test]
    fn failure_after_closing_is_silent() {
        let t = TestApp::signed_in("/pacientes");
        let vm = PacientesViewModel::new(&t.app);
        let release = t.transport.hold_next();

        let mut pool = LocalPool::new();
        let loader = vm.clone();
        pool.spawner()
            .spawn_local(async move { loader.carregar().await })
            .unwrap();
        pool.run_until_stalled();

        vm.dispose();
        t.transport.fail_next(MockFailure::Status(500, String::new()));
        release.send(()).unwrap();
        pool.run();

        assert_eq!(t.snackbar(), None);
        assert_eq!(vm.lista.data(), Some(Vec::new()));
    }
}
