// ============================================================================
// TELEMEDICINA VIEW - Open teleconsultations and the call controls
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::ElementBuilder;
use crate::models::{Consulta, ConsultaTipo};
use crate::viewmodels::telemedicina_viewmodel::ChamadaAtiva;
use crate::viewmodels::{ConsultasViewModel, EstadoChamada, TelemedicinaViewModel};
use crate::views::consultas::status_badge;
use crate::views::widgets::{button, empty_state, spinner};

pub fn render_telemedicina(
    vm: &TelemedicinaViewModel,
    consultas: &ConsultasViewModel,
) -> Result<Element, JsValue> {
    let content = match vm.estado.get() {
        EstadoChamada::Inativa => render_fila(vm, consultas)?,
        EstadoChamada::Iniciando(consulta_id) => {
            spinner(&format!("Conectando à sala da consulta #{}...", consulta_id))?
        }
        EstadoChamada::Ativa(chamada) => render_chamada(vm, &chamada)?,
    };
    Ok(ElementBuilder::new("div")?
        .class("telemedicina")
        .child(content)?
        .build())
}

/// Teleconsultations that can still be started
fn render_fila(vm: &TelemedicinaViewModel, consultas: &ConsultasViewModel) -> Result<Element, JsValue> {
    if consultas.lista.is_loading() && consultas.lista.data().map_or(true, |l| l.is_empty()) {
        return spinner("Carregando teleconsultas...");
    }

    let abertas: Vec<Consulta> = consultas
        .visiveis()
        .into_iter()
        .filter(|c| c.tipo == ConsultaTipo::Telemedicina && c.status.is_open())
        .collect();
    if abertas.is_empty() {
        return empty_state("Nenhuma teleconsulta agendada");
    }

    let list = ElementBuilder::new("ul")?.class("tele-list").build();
    for consulta in abertas {
        let id = consulta.id;
        let iniciar = {
            let vm = vm.clone();
            button("Iniciar chamada", "btn btn-primary", move |_| {
                let vm = vm.clone();
                spawn_local(async move {
                    if let Err(e) = vm.iniciar(id).await {
                        log::warn!("⚠️ Could not start call for consulta {}: {}", id, e);
                    }
                });
            })?
        };
        let item = ElementBuilder::new("li")?
            .class("tele-item")
            .child(
                ElementBuilder::new("div")?
                    .class("tele-info")
                    .child(ElementBuilder::new("strong")?.text(&consulta.paciente).build())?
                    .child(
                        ElementBuilder::new("span")?
                            .text(&format!("{} · {} {}", consulta.medico, consulta.data, consulta.hora))
                            .build(),
                    )?
                    .child(status_badge(consulta.status)?)?
                    .build(),
            )?
            .child(iniciar)?
            .build();
        list.append_child(&item)?;
    }

    ElementBuilder::new("div")?
        .child(ElementBuilder::new("h3")?.text("Teleconsultas agendadas").build())?
        .child(list)
        .map(ElementBuilder::build)
}

fn toggle(label_on: &str, label_off: &str, on: bool, handler: impl Fn() + 'static) -> Result<Element, JsValue> {
    let (label, class) = if on {
        (label_on, "btn control active")
    } else {
        (label_off, "btn control")
    };
    button(label, class, move |_| handler())
}

fn render_chamada(vm: &TelemedicinaViewModel, chamada: &ChamadaAtiva) -> Result<Element, JsValue> {
    let video = ElementBuilder::new("div")?
        .class("video-stage")
        .child(
            ElementBuilder::new("div")?
                .class("video-placeholder")
                .text(if chamada.camera { "📹" } else { "🚫📹" })
                .build(),
        )?
        .child(
            ElementBuilder::new("div")?
                .class("room-name")
                .text(&format!("Sala {}", chamada.sessao.room_name))
                .build(),
        )?
        .build();
    if chamada.gravando {
        video.append_child(
            &ElementBuilder::new("span")?
                .class("recording-badge")
                .text("● REC")
                .build(),
        )?;
    }

    let participantes = ElementBuilder::new("ul")?.class("participants").build();
    for participante in &chamada.sessao.participantes {
        participantes.append_child(
            &ElementBuilder::new("li")?
                .text(&format!("{} ({})", participante.nome, participante.tipo))
                .build(),
        )?;
    }

    let controls = ElementBuilder::new("div")?.class("call-controls").build();
    {
        let vm = vm.clone();
        controls.append_child(&toggle("🎤 Mudo", "🔇 Ativar microfone", chamada.microfone, move || {
            vm.alternar_microfone()
        })?)?;
    }
    {
        let vm = vm.clone();
        controls.append_child(&toggle("📷 Desligar câmera", "📷 Ligar câmera", chamada.camera, move || {
            vm.alternar_camera()
        })?)?;
    }
    {
        let vm = vm.clone();
        controls.append_child(&toggle(
            "🖥️ Parar compartilhamento",
            "🖥️ Compartilhar tela",
            chamada.compartilhando_tela,
            move || vm.alternar_compartilhamento(),
        )?)?;
    }
    {
        let vm = vm.clone();
        controls.append_child(&toggle("⏹️ Parar gravação", "⏺️ Gravar", chamada.gravando, move || {
            let vm = vm.clone();
            spawn_local(async move {
                if let Err(e) = vm.alternar_gravacao().await {
                    log::warn!("⚠️ Recording toggle failed: {}", e);
                }
            });
        })?)?;
    }
    {
        let vm = vm.clone();
        controls.append_child(&button("🔑 Renovar token", "btn control", move |_| {
            let vm = vm.clone();
            spawn_local(async move {
                if let Err(e) = vm.renovar_token().await {
                    log::warn!("⚠️ Token refresh failed: {}", e);
                }
            });
        })?)?;
    }
    {
        let vm = vm.clone();
        controls.append_child(&button("📞 Encerrar", "btn btn-danger", move |_| {
            let vm = vm.clone();
            spawn_local(async move {
                if let Err(e) = vm.encerrar().await {
                    log::warn!("⚠️ Could not end the call: {}", e);
                }
            });
        })?)?;
    }

    ElementBuilder::new("div")?
        .class("call")
        .child(video)?
        .child(
            ElementBuilder::new("aside")?
                .class("call-sidebar")
                .child(ElementBuilder::new("h4")?.text("Participantes").build())?
                .child(participantes)?
                .build(),
        )?
        .child(controls)
        .map(ElementBuilder::build)
}
