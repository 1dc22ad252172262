// ============================================================================
// DASHBOARD VIEWS - Summary cards and the advanced period/indicator panels
// ============================================================================

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{field_value, on_change, set_attribute, ElementBuilder};
use crate::models::{ConsultasPorPeriodo, Estatisticas, IndicadorValor};
use crate::viewmodels::{error_message, DashboardViewModel, Periodo, RequestState};
use crate::views::widgets::{button, empty_state, form_group, select, spinner, stat_card, table_head, text_input, text_row};

const PERIODOS: [(&str, &str); 4] = [
    ("7dias", "Últimos 7 dias"),
    ("30dias", "Últimos 30 dias"),
    ("3meses", "Últimos 3 meses"),
    ("personalizado", "Personalizado"),
];

/// Spinner while loading, the error text on failure, `content` otherwise.
fn panel<T, F>(title: &str, state: &RequestState<T>, content: F) -> Result<Element, JsValue>
where
    T: Clone,
    F: FnOnce(T) -> Result<Element, JsValue>,
{
    let body = match (state.data(), state.error()) {
        _ if state.is_loading() => spinner("Carregando...")?,
        (_, Some(error)) => ElementBuilder::new("div")?
            .class("alert alert-error")
            .text(&error_message(&error))
            .build(),
        (Some(data), None) => content(data)?,
        (None, None) => empty_state("Sem dados")?,
    };
    Ok(ElementBuilder::new("div")?
        .class("panel")
        .child(ElementBuilder::new("h3")?.class("panel-title").text(title).build())?
        .child(body)?
        .build())
}

fn render_cards(stats: Estatisticas) -> Result<Element, JsValue> {
    ElementBuilder::new("div")?
        .class("stats-grid")
        .child(stat_card("👥", "Total de Pacientes", &stats.total_pacientes.to_string())?)?
        .child(stat_card("📅", "Consultas Hoje", &stats.consultas_hoje.to_string())?)?
        .child(stat_card("🎥", "Teleconsultas", &stats.teleconsultas.to_string())?)?
        .child(stat_card("🏥", "Taxa de Ocupação", &format!("{:.0}%", stats.taxa_ocupacao))?)
        .map(ElementBuilder::build)
}

fn render_periodo(dados: ConsultasPorPeriodo) -> Result<Element, JsValue> {
    if dados.pontos.is_empty() {
        return empty_state("Nenhuma consulta no período");
    }
    let maximo = dados
        .pontos
        .iter()
        .map(|p| p.presencial + p.telemedicina)
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = ElementBuilder::new("div")?.class("bar-chart").build();
    for ponto in &dados.pontos {
        let total = ponto.presencial + ponto.telemedicina;
        let bar = ElementBuilder::new("div")?
            .class("bar")
            .attr("style", &format!("height: {}%", total * 100 / maximo))?
            .attr(
                "title",
                &format!("Presencial: {} / Telemedicina: {}", ponto.presencial, ponto.telemedicina),
            )?
            .build();
        chart.append_child(
            &ElementBuilder::new("div")?
                .class("bar-column")
                .child(bar)?
                .child(ElementBuilder::new("span")?.class("bar-label").text(&ponto.data).build())?
                .build(),
        )?;
    }

    let table = ElementBuilder::new("table")?
        .class("data-table")
        .child(table_head(&["Data", "Presencial", "Telemedicina"])?)?
        .build();
    let tbody = ElementBuilder::new("tbody")?.build();
    for ponto in &dados.pontos {
        tbody.append_child(&text_row(&[
            &ponto.data,
            &ponto.presencial.to_string(),
            &ponto.telemedicina.to_string(),
        ])?)?;
    }
    table.append_child(&tbody)?;

    Ok(ElementBuilder::new("div")?
        .child(
            ElementBuilder::new("p")?
                .class("panel-summary")
                .text(&format!(
                    "{} consultas entre {} e {}",
                    dados.total(),
                    dados.data_inicio,
                    dados.data_fim
                ))
                .build(),
        )?
        .child(chart)?
        .child(table)?
        .build())
}

fn render_indicador(titulo: &str, unidade: &str, valores: &[IndicadorValor]) -> Result<Element, JsValue> {
    let list = ElementBuilder::new("ul")?.class("indicator-list").build();
    for valor in valores {
        list.append_child(
            &ElementBuilder::new("li")?
                .child(ElementBuilder::new("span")?.text(&valor.nome).build())?
                .child(
                    ElementBuilder::new("strong")?
                        .text(&format!("{}{}", valor.valor, unidade))
                        .build(),
                )?
                .build(),
        )?;
    }
    Ok(ElementBuilder::new("div")?
        .class("indicator")
        .child(ElementBuilder::new("h4")?.text(titulo).build())?
        .child(list)?
        .build())
}

fn render_filtro(vm: &DashboardViewModel) -> Result<Element, JsValue> {
    let periodo = vm.periodo.get();
    let picker = select(&PERIODOS, periodo.chave())?;
    {
        let vm = vm.clone();
        let field = picker.clone();
        on_change(&picker, move |_| {
            let Some(periodo) = Periodo::from_chave(&field_value(&field), vm.hoje()) else {
                return;
            };
            let vm = vm.clone();
            spawn_local(async move { vm.selecionar_periodo(periodo).await });
        })?;
    }
    let (picker_group, _) = form_group("Período", &picker)?;
    let toolbar = ElementBuilder::new("div")?
        .class("toolbar")
        .child(picker_group)?
        .build();

    if let Periodo::Personalizado { .. } = periodo {
        let (inicio, fim) = vm.intervalo();
        toolbar.append_child(&date_field(vm, "Data inicial", &inicio, true)?)?;
        toolbar.append_child(&date_field(vm, "Data final", &fim, false)?)?;

        let vm = vm.clone();
        toolbar.append_child(&button("Aplicar", "btn btn-primary", move |_| {
            let vm = vm.clone();
            spawn_local(async move { vm.atualizar_consultas().await });
        })?)?;
    }
    Ok(toolbar)
}

fn date_field(vm: &DashboardViewModel, label: &str, value: &str, inicio: bool) -> Result<Element, JsValue> {
    let input = text_input("date", value, "")?;
    set_attribute(&input, "max", &vm.hoje().format("%Y-%m-%d").to_string())?;
    {
        let vm = vm.clone();
        let field = input.clone();
        on_change(&input, move |_| {
            let Ok(data) = NaiveDate::parse_from_str(&field_value(&field), "%Y-%m-%d") else {
                return;
            };
            if inicio {
                vm.editar_intervalo(Some(data), None);
            } else {
                vm.editar_intervalo(None, Some(data));
            }
        })?;
    }
    form_group(label, &input).map(|(group, _)| group)
}

pub fn render_dashboard(vm: &DashboardViewModel) -> Result<Element, JsValue> {
    ElementBuilder::new("div")?
        .class("dashboard")
        .child(panel("Visão geral", &vm.estatisticas, render_cards)?)?
        .child(panel("Consultas nos últimos 7 dias", &vm.consultas, render_periodo)?)
        .map(ElementBuilder::build)
}

pub fn render_dashboard_avancado(vm: &DashboardViewModel) -> Result<Element, JsValue> {
    let indicadores = panel("Indicadores", &vm.indicadores, |dados| {
        ElementBuilder::new("div")?
            .class("indicators-grid")
            .child(render_indicador("Consultas por tipo", "%", &dados.consultas_por_tipo)?)?
            .child(render_indicador(
                "Tempo de espera (mediana)",
                " min",
                &dados.tempo_espera_mediana,
            )?)
            .map(ElementBuilder::build)
    })?;

    ElementBuilder::new("div")?
        .class("dashboard dashboard-advanced")
        .child(render_filtro(vm)?)?
        .child(panel("Consultas por período", &vm.consultas, render_periodo)?)?
        .child(indicadores)
        .map(ElementBuilder::build)
}
