// ============================================================================
// CONSULTAS VIEW - Appointment table, status filter and scheduling dialog
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, body, clear_children, field_value, on_change, on_value, prompt, remove_element,
    ElementBuilder,
};
use crate::models::{Consulta, ConsultaStatus};
use crate::viewmodels::{ConsultaForm, ConsultasViewModel, FormError};
use crate::views::widgets::{
    bound_field, button, dialog, empty_state, select, show_errors, spinner, table_head, text_input,
};

const STATUS: [(&str, &str); 5] = [
    ("", "Todos os status"),
    ("agendada", "Agendada"),
    ("confirmada", "Confirmada"),
    ("cancelada", "Cancelada"),
    ("concluida", "Concluída"),
];

const TIPOS: [(&str, &str); 3] = [
    ("", "Selecione"),
    ("presencial", "Presencial"),
    ("telemedicina", "Telemedicina"),
];

fn status_value(status: Option<ConsultaStatus>) -> &'static str {
    match status {
        None => "",
        Some(ConsultaStatus::Agendada) => "agendada",
        Some(ConsultaStatus::Confirmada) => "confirmada",
        Some(ConsultaStatus::Cancelada) => "cancelada",
        Some(ConsultaStatus::Concluida) => "concluida",
    }
}

pub fn status_badge(status: ConsultaStatus) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("span")?
        .class(&format!("badge badge-{}", status_value(Some(status))))
        .text(status.label())
        .build())
}

pub fn render_consultas(vm: &ConsultasViewModel) -> Result<Element, JsValue> {
    let table_slot = ElementBuilder::new("div")?.class("table-container").build();

    let busca = text_input("search", &vm.busca.get(), "Buscar por paciente ou médico")?;
    {
        let vm = vm.clone();
        let slot = table_slot.clone();
        on_value(&busca, move |value| {
            vm.busca.set(value);
            if let Err(e) = fill_table(&slot, &vm) {
                log::error!("❌ Could not redraw appointment table: {:?}", e);
            }
        })?;
    }

    let status = select(&STATUS, status_value(vm.filtro.get().status))?;
    {
        let vm = vm.clone();
        let field = status.clone();
        on_change(&status, move |_| {
            let escolhido = ConsultaStatus::parse(&field_value(&field));
            vm.filtro.update(|filtro| filtro.status = escolhido);
            let vm = vm.clone();
            spawn_local(async move { vm.carregar().await });
        })?;
    }

    let nova = {
        let vm = vm.clone();
        button("+ Nova Consulta", "btn btn-primary", move |_| {
            if let Err(e) = open_dialog(&vm) {
                log::error!("❌ Could not open appointment dialog: {:?}", e);
            }
        })?
    };

    let toolbar = ElementBuilder::new("div")?
        .class("toolbar")
        .child(busca)?
        .child(status)?
        .child(nova)?
        .build();

    fill_table(&table_slot, vm)?;

    Ok(ElementBuilder::new("div")?
        .class("consultas")
        .child(toolbar)?
        .child(table_slot)?
        .build())
}

fn fill_table(slot: &Element, vm: &ConsultasViewModel) -> Result<(), JsValue> {
    clear_children(slot);

    if vm.lista.is_loading() && vm.lista.data().map_or(true, |l| l.is_empty()) {
        return append_child(slot, &spinner("Carregando consultas...")?);
    }

    let visiveis = vm.visiveis();
    if visiveis.is_empty() {
        return append_child(slot, &empty_state("Nenhuma consulta encontrada")?);
    }

    let tbody = ElementBuilder::new("tbody")?.build();
    for consulta in visiveis {
        tbody.append_child(&render_row(vm, consulta)?)?;
    }
    let table = ElementBuilder::new("table")?
        .class("data-table")
        .child(table_head(&["Paciente", "Médico", "Data", "Hora", "Tipo", "Status", "Ações"])?)?
        .child(tbody)?
        .build();
    append_child(slot, &table)
}

fn render_row(vm: &ConsultasViewModel, consulta: Consulta) -> Result<Element, JsValue> {
    let acoes = ElementBuilder::new("td")?.class("actions").build();
    if consulta.status.is_open() {
        let id = consulta.id;
        let concluir = {
            let vm = vm.clone();
            button("Concluir", "btn btn-small", move |_| {
                let Some(observacoes) = prompt("Observações da consulta (opcional)") else {
                    return;
                };
                let vm = vm.clone();
                spawn_local(async move {
                    let observacoes = Some(observacoes.trim()).filter(|o| !o.is_empty());
                    if let Err(e) = vm.concluir(id, observacoes).await {
                        log::warn!("⚠️ Could not conclude consulta {}: {}", id, e);
                    }
                });
            })?
        };
        let cancelar = {
            let vm = vm.clone();
            button("Cancelar", "btn btn-small btn-danger", move |_| {
                let Some(motivo) = prompt("Motivo do cancelamento (opcional)") else {
                    return;
                };
                let vm = vm.clone();
                spawn_local(async move {
                    let motivo = Some(motivo.trim()).filter(|m| !m.is_empty());
                    if let Err(e) = vm.cancelar(id, motivo).await {
                        log::warn!("⚠️ Could not cancel consulta {}: {}", id, e);
                    }
                });
            })?
        };
        acoes.append_child(&concluir)?;
        acoes.append_child(&cancelar)?;
    }

    let status = ElementBuilder::new("td")?.child(status_badge(consulta.status)?)?.build();
    ElementBuilder::new("tr")?
        .child(ElementBuilder::new("td")?.text(&consulta.paciente).build())?
        .child(ElementBuilder::new("td")?.text(&consulta.medico).build())?
        .child(ElementBuilder::new("td")?.text(&consulta.data).build())?
        .child(ElementBuilder::new("td")?.text(&consulta.hora).build())?
        .child(ElementBuilder::new("td")?.text(consulta.tipo.label()).build())?
        .child(status)?
        .child(acoes)
        .map(ElementBuilder::build)
}

fn open_dialog(vm: &ConsultasViewModel) -> Result<(), JsValue> {
    let (overlay, content) = dialog("Nova Consulta")?;
    let form = Rc::new(RefCell::new(ConsultaForm::default()));
    let mut slots: Vec<(&'static str, Element)> = Vec::new();

    let campos: [(&'static str, &str, Element, fn(&mut ConsultaForm, String)); 5] = [
        ("paciente", "Paciente", text_input("text", "", "Nome do paciente")?, |f, v| f.paciente = v),
        ("medico", "Médico", text_input("text", "", "Nome do médico")?, |f, v| f.medico = v),
        ("data", "Data", text_input("date", "", "")?, |f, v| f.data = v),
        ("hora", "Hora", text_input("time", "", "")?, |f, v| f.hora = v),
        ("tipo", "Tipo", select(&TIPOS, "")?, |f, v| f.tipo = v),
    ];
    for (campo, label, control, setter) in campos {
        let (group, error) = bound_field(&form, label, control, setter)?;
        content.append_child(&group)?;
        slots.push((campo, error));
    }

    let cancelar = {
        let overlay = overlay.clone();
        button("Cancelar", "btn btn-outline", move |_| remove_element(&overlay))?
    };
    let agendar = {
        let vm = vm.clone();
        let overlay = overlay.clone();
        let slots = Rc::new(slots);
        button("Agendar", "btn btn-primary", move |_| {
            let vm = vm.clone();
            let overlay = overlay.clone();
            let slots = slots.clone();
            let dados = form.borrow().clone();
            spawn_local(async move {
                match vm.agendar(&dados).await {
                    Ok(consulta) => {
                        log::info!("📅 Consulta {} scheduled", consulta.id);
                        remove_element(&overlay);
                    }
                    Err(FormError::Validation(errors)) => show_errors(&slots, &errors),
                    Err(FormError::Api(e)) => log::warn!("⚠️ Scheduling failed: {}", e),
                }
            });
        })?
    };
    content.append_child(
        &ElementBuilder::new("div")?
            .class("dialog-actions")
            .child(cancelar)?
            .child(agendar)?
            .build(),
    )?;

    append_child(&body()?, &overlay)
}
