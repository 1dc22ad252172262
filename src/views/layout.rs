// ============================================================================
// LAYOUT - Side navigation, header with the signed-in user, content slot
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{on_click, ElementBuilder};
use crate::routing::Route;
use crate::state::AppState;
use crate::views::widgets::button;

fn nav_icon(route: Route) -> &'static str {
    match route {
        Route::Dashboard => "📊",
        Route::DashboardAvancado => "📈",
        Route::Pacientes => "🧑‍⚕️",
        Route::Consultas => "📅",
        Route::Telemedicina => "🎥",
        Route::Login | Route::NotFound => "•",
    }
}

fn render_nav(app: &AppState, active: Route) -> Result<Element, JsValue> {
    let list = ElementBuilder::new("ul")?.class("nav-list").build();
    for route in Route::NAVIGATION {
        let link = ElementBuilder::new("a")?
            .class("nav-link")
            .class_if("active", route == active)?
            .attr("href", route.path())?
            .child(ElementBuilder::new("span")?.class("nav-icon").text(nav_icon(route)).build())?
            .child(ElementBuilder::new("span")?.text(route.title()).build())?
            .build();
        let app = app.clone();
        on_click(&link, move |event| {
            event.prevent_default();
            app.navigate(route.path());
        })?;
        list.append_child(&ElementBuilder::new("li")?.child(link)?.build())?;
    }

    Ok(ElementBuilder::new("nav")?
        .class("sidebar")
        .child(
            ElementBuilder::new("div")?
                .class("sidebar-brand")
                .text("VidaPlus")
                .build(),
        )?
        .child(list)?
        .build())
}

fn render_header(app: &AppState, route: Route) -> Result<Element, JsValue> {
    let user = ElementBuilder::new("div")?.class("header-user").build();
    if let Some(session) = app.session.current() {
        user.append_child(
            &ElementBuilder::new("span")?
                .class("user-name")
                .text(session.display_name())
                .build(),
        )?;
        user.append_child(
            &ElementBuilder::new("span")?
                .class("user-role")
                .text(session.role().label())
                .build(),
        )?;
    }

    let auth = app.auth.clone();
    let logout = button("Sair", "btn btn-outline", move |_| {
        let auth = auth.clone();
        spawn_local(async move { auth.logout().await });
    })?;
    user.append_child(&logout)?;

    Ok(ElementBuilder::new("header")?
        .class("app-header")
        .child(ElementBuilder::new("h1")?.class("page-title").text(route.title()).build())?
        .child(user)?
        .build())
}

/// Wraps a protected screen
pub fn render_layout(app: &AppState, route: Route, content: Element) -> Result<Element, JsValue> {
    let main = ElementBuilder::new("main")?
        .class("app-main")
        .child(render_header(app, route)?)?
        .child(ElementBuilder::new("section")?.class("app-content").child(content)?.build())?
        .build();

    Ok(ElementBuilder::new("div")?
        .class("app-layout")
        .child(render_nav(app, route)?)?
        .child(main)?
        .build())
}

pub fn render_not_found(app: &AppState) -> Result<Element, JsValue> {
    let app = app.clone();
    let home = button("Voltar ao início", "btn btn-primary", move |_| {
        app.navigate(Route::Dashboard.path())
    })?;
    Ok(ElementBuilder::new("div")?
        .class("not-found")
        .child(ElementBuilder::new("h2")?.text("Página não encontrada").build())?
        .child(home)?
        .build())
}
