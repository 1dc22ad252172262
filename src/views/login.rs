// ============================================================================
// LOGIN VIEW
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    add_class, on_submit, on_value, remove_attribute, set_attribute, set_class_name,
    set_text_content, ElementBuilder,
};
use crate::services::mock_transport::{MOCK_EMAIL, MOCK_PASSWORD};
use crate::state::AppState;
use crate::viewmodels::{LoginError, LoginViewModel};
use crate::views::widgets::{form_group, text_input};

pub fn render_login(app: &AppState, vm: Rc<LoginViewModel>) -> Result<Element, JsValue> {
    log::debug!("🎬 render_login");

    let email = Rc::new(RefCell::new(String::new()));
    let senha = Rc::new(RefCell::new(String::new()));

    let header = ElementBuilder::new("div")?
        .class("login-header")
        .child(ElementBuilder::new("div")?.class("login-logo").text("🏥").build())?
        .child(ElementBuilder::new("h1")?.text("SGHSS VidaPlus").build())?
        .child(
            ElementBuilder::new("p")?
                .text("Sistema de Gestão Hospitalar e de Serviços de Saúde")
                .build(),
        )?
        .build();

    let card = ElementBuilder::new("div")?
        .class("login-container")
        .child(header)?
        .build();

    if let Some(banner) = vm.expired_banner() {
        card.append_child(
            &ElementBuilder::new("div")?
                .class("alert alert-info")
                .text(banner)
                .build(),
        )?;
    }

    let error_alert = ElementBuilder::new("div")?.class("alert alert-error hidden").build();
    card.append_child(&error_alert)?;

    let email_input = text_input("email", "", "seu@email.com")?;
    set_attribute(&email_input, "autocomplete", "username")?;
    let (email_group, email_error) = form_group("Email", &email_input)?;
    {
        let email = email.clone();
        on_value(&email_input, move |value| *email.borrow_mut() = value)?;
    }

    let senha_input = text_input("password", "", "Sua senha")?;
    set_attribute(&senha_input, "autocomplete", "current-password")?;
    let (senha_group, senha_error) = form_group("Senha", &senha_input)?;
    {
        let senha = senha.clone();
        on_value(&senha_input, move |value| *senha.borrow_mut() = value)?;
    }

    let submit = ElementBuilder::new("button")?
        .attr("type", "submit")?
        .class("btn btn-primary btn-login")
        .text("Entrar")
        .build();

    let form = ElementBuilder::new("form")?
        .class("login-form")
        .attr("novalidate", "")?
        .child(email_group)?
        .child(senha_group)?
        .child(submit.clone())?
        .build();

    on_submit(&form, move || {
        set_text_content(&email_error, "");
        set_text_content(&senha_error, "");
        set_class_name(&error_alert, "alert alert-error hidden");

        let email_value = email.borrow().clone();
        let senha_value = senha.borrow().clone();
        if let Err(errors) = LoginViewModel::validate(&email_value, &senha_value) {
            set_text_content(&email_error, errors.get("email").unwrap_or_default());
            set_text_content(&senha_error, errors.get("senha").unwrap_or_default());
            return;
        }

        let vm = vm.clone();
        let submit = submit.clone();
        let error_alert = error_alert.clone();
        let _ = set_attribute(&submit, "disabled", "");
        set_text_content(&submit, "Entrando...");
        spawn_local(async move {
            let result = vm.submit(&email_value, &senha_value).await;
            let _ = remove_attribute(&submit, "disabled");
            set_text_content(&submit, "Entrar");
            match result {
                Ok(session) => log::info!("✅ Signed in as {}", session.user.email),
                Err(e) => {
                    if !matches!(e, LoginError::InvalidCredentials) {
                        log::warn!("⚠️ Login failed: {}", e);
                    }
                    set_text_content(&error_alert, &e.message());
                    set_class_name(&error_alert, "alert alert-error");
                }
            }
        });
    })?;

    card.append_child(&form)?;

    if app.config.use_mock_api {
        let hint = ElementBuilder::new("p")?
            .class("login-hint")
            .text(&format!("Acesso de teste: {} / {}", MOCK_EMAIL, MOCK_PASSWORD))
            .build();
        card.append_child(&hint)?;
    }

    let screen = ElementBuilder::new("div")?
        .class("login-screen")
        .child(card)?
        .build();
    add_class(&screen, "fade-in")?;
    Ok(screen)
}
