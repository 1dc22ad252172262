// ============================================================================
// PACIENTES VIEW - Searchable, sortable table and the patient dialog
// ============================================================================
// Search and sort redraw only the table so the search box keeps focus.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, body, clear_children, confirm, is_checked, on_change, on_click, on_value,
    remove_element, ElementBuilder,
};
use crate::models::Paciente;
use crate::viewmodels::forms::DADOS_SENSIVEIS;
use crate::viewmodels::{FormError, OrdenacaoPaciente, PacienteForm, PacientesViewModel};
use crate::views::widgets::{
    bound_field, button, checkbox, dialog, empty_state, show_errors, spinner, text_input,
};

const COLUNAS: [(OrdenacaoPaciente, &str); 3] = [
    (OrdenacaoPaciente::Nome, "Nome"),
    (OrdenacaoPaciente::Cpf, "CPF"),
    (OrdenacaoPaciente::Telefone, "Telefone"),
];

pub fn render_pacientes(vm: &PacientesViewModel) -> Result<Element, JsValue> {
    let table_slot = ElementBuilder::new("div")?.class("table-container").build();

    let busca = text_input("search", &vm.filtro.get(), "Buscar por nome, CPF ou telefone")?;
    {
        let vm = vm.clone();
        let slot = table_slot.clone();
        on_value(&busca, move |value| {
            vm.filtro.set(value);
            if let Err(e) = fill_table(&slot, &vm) {
                log::error!("❌ Could not redraw patient table: {:?}", e);
            }
        })?;
    }

    let novo = {
        let vm = vm.clone();
        button("+ Novo Paciente", "btn btn-primary", move |_| {
            if let Err(e) = open_dialog(&vm, None, PacienteForm::default()) {
                log::error!("❌ Could not open patient dialog: {:?}", e);
            }
        })?
    };

    let toolbar = ElementBuilder::new("div")?
        .class("toolbar")
        .child(busca)?
        .child(novo)?
        .build();

    fill_table(&table_slot, vm)?;

    Ok(ElementBuilder::new("div")?
        .class("pacientes")
        .child(toolbar)?
        .child(table_slot)?
        .build())
}

fn fill_table(slot: &Element, vm: &PacientesViewModel) -> Result<(), JsValue> {
    clear_children(slot);

    let carregando = vm.lista.is_loading() && vm.lista.data().map_or(true, |l| l.is_empty());
    if carregando {
        return append_child(slot, &spinner("Carregando pacientes...")?);
    }

    let ordenacao = vm.ordenacao.get();
    let head_row = ElementBuilder::new("tr")?.build();
    for (coluna, titulo) in COLUNAS {
        let th = ElementBuilder::new("th")?
            .class("sortable")
            .class_if("sorted", coluna == ordenacao)?
            .text(titulo)
            .build();
        let vm = vm.clone();
        let slot = slot.clone();
        on_click(&th, move |_| {
            vm.ordenacao.set(coluna);
            if let Err(e) = fill_table(&slot, &vm) {
                log::error!("❌ Could not redraw patient table: {:?}", e);
            }
        })?;
        head_row.append_child(&th)?;
    }
    head_row.append_child(&ElementBuilder::new("th")?.text("Email").build())?;
    head_row.append_child(&ElementBuilder::new("th")?.text("Ações").build())?;

    let visiveis = vm.visiveis();
    if visiveis.is_empty() {
        return append_child(slot, &empty_state("Nenhum paciente encontrado")?);
    }

    let tbody = ElementBuilder::new("tbody")?.build();
    for paciente in visiveis {
        tbody.append_child(&render_row(vm, paciente)?)?;
    }

    let table = ElementBuilder::new("table")?
        .class("data-table")
        .child(ElementBuilder::new("thead")?.child(head_row)?.build())?
        .child(tbody)?
        .build();
    append_child(slot, &table)
}

fn render_row(vm: &PacientesViewModel, paciente: Paciente) -> Result<Element, JsValue> {
    let editar = {
        let vm = vm.clone();
        let paciente = paciente.clone();
        button("Editar", "btn btn-small", move |_| {
            let form = PacienteForm::from_paciente(&paciente);
            if let Err(e) = open_dialog(&vm, Some(paciente.id), form) {
                log::error!("❌ Could not open patient dialog: {:?}", e);
            }
        })?
    };
    let excluir = {
        let vm = vm.clone();
        let (id, nome) = (paciente.id, paciente.nome.clone());
        button("Excluir", "btn btn-small btn-danger", move |_| {
            if !confirm(&format!("Excluir o paciente {}?", nome)) {
                return;
            }
            let vm = vm.clone();
            spawn_local(async move {
                if let Err(e) = vm.excluir(id).await {
                    log::warn!("⚠️ Delete of paciente {} failed: {}", id, e);
                }
            });
        })?
    };

    let acoes = ElementBuilder::new("td")?
        .class("actions")
        .child(editar)?
        .child(excluir)?
        .build();

    ElementBuilder::new("tr")?
        .child(ElementBuilder::new("td")?.text(&paciente.nome).build())?
        .child(ElementBuilder::new("td")?.text(&paciente.cpf).build())?
        .child(ElementBuilder::new("td")?.text(&paciente.telefone).build())?
        .child(ElementBuilder::new("td")?.text(&paciente.email).build())?
        .child(acoes)
        .map(ElementBuilder::build)
}

/// Create (`id == None`) or edit dialog, mounted on <body> until saved or cancelled.
fn open_dialog(vm: &PacientesViewModel, id: Option<u64>, inicial: PacienteForm) -> Result<(), JsValue> {
    let titulo = if id.is_some() { "Editar Paciente" } else { "Novo Paciente" };
    let (overlay, content) = dialog(titulo)?;
    let form = Rc::new(RefCell::new(inicial.clone()));
    let mut slots: Vec<(&'static str, Element)> = Vec::new();

    let campos: [(&'static str, &str, &str, &str, fn(&mut PacienteForm, String)); 6] = [
        ("nome", "Nome", "text", inicial.nome.as_str(), |f, v| f.nome = v),
        ("cpf", "CPF", "text", inicial.cpf.as_str(), |f, v| f.cpf = v),
        ("telefone", "Telefone", "tel", inicial.telefone.as_str(), |f, v| f.telefone = v),
        ("email", "Email", "email", inicial.email.as_str(), |f, v| f.email = v),
        ("dataNascimento", "Data de Nascimento", "date", inicial.data_nascimento.as_str(), |f, v| {
            f.data_nascimento = v
        }),
        ("endereco", "Endereço", "text", inicial.endereco.as_str(), |f, v| f.endereco = v),
    ];
    for (campo, label, kind, valor, setter) in campos {
        let (group, error) = bound_field(&form, label, text_input(kind, valor, "")?, setter)?;
        content.append_child(&group)?;
        slots.push((campo, error));
    }

    let sensiveis = ElementBuilder::new("fieldset")?
        .class("form-group")
        .child(ElementBuilder::new("legend")?.text("Dados sensíveis autorizados").build())?
        .build();
    for (categoria, label) in DADOS_SENSIVEIS {
        let (wrapper, input) = checkbox(label, inicial.dados_sensiveis.iter().any(|c| c == categoria))?;
        let form = form.clone();
        on_change(&input, move |_| form.borrow_mut().toggle_dado_sensivel(categoria))?;
        sensiveis.append_child(&wrapper)?;
    }
    let sensiveis_error = ElementBuilder::new("span")?.class("field-error").build();
    sensiveis.append_child(&sensiveis_error)?;
    content.append_child(&sensiveis)?;
    slots.push(("dadosSensiveis", sensiveis_error));

    let (termo, termo_input) = checkbox(
        "Li e aceito os termos de privacidade (LGPD)",
        inicial.termo_privacidade,
    )?;
    {
        let form = form.clone();
        let field = termo_input.clone();
        on_change(&termo_input, move |_| form.borrow_mut().termo_privacidade = is_checked(&field))?;
    }
    let termo_error = ElementBuilder::new("span")?.class("field-error").build();
    content.append_child(&termo)?;
    content.append_child(&termo_error)?;
    slots.push(("termoPrivacidade", termo_error));

    let (compartilhar, compartilhar_input) = checkbox(
        "Autorizo o compartilhamento dos dados com profissionais da rede",
        inicial.autoriza_compartilhamento,
    )?;
    {
        let form = form.clone();
        let field = compartilhar_input.clone();
        on_change(&compartilhar_input, move |_| {
            form.borrow_mut().autoriza_compartilhamento = is_checked(&field)
        })?;
    }
    content.append_child(&compartilhar)?;

    let cancelar = {
        let overlay = overlay.clone();
        button("Cancelar", "btn btn-outline", move |_| remove_element(&overlay))?
    };
    let salvar = {
        let vm = vm.clone();
        let overlay = overlay.clone();
        let slots = Rc::new(slots);
        button("Salvar", "btn btn-primary", move |_| {
            let vm = vm.clone();
            let overlay = overlay.clone();
            let slots = slots.clone();
            let dados = form.borrow().clone();
            spawn_local(async move {
                match vm.salvar(id, &dados).await {
                    Ok(paciente) => {
                        log::info!("💾 Paciente {} saved", paciente.id);
                        remove_element(&overlay);
                    }
                    Err(FormError::Validation(errors)) => show_errors(&slots, &errors),
                    // Already reported in the snackbar
                    Err(FormError::Api(e)) => log::warn!("⚠️ Save failed: {}", e),
                }
            });
        })?
    };
    content.append_child(
        &ElementBuilder::new("div")?
            .class("dialog-actions")
            .child(cancelar)?
            .child(salvar)?
            .build(),
    )?;

    append_child(&body()?, &overlay)
}
