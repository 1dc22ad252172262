// ============================================================================
// FEEDBACK - Snackbar and global loading bar
// ============================================================================
// Both live on <body> outside the re-rendered root and update in place.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, body, on_click, set_class_name, set_text_content, ElementBuilder};
use crate::state::AppState;

pub fn mount_snackbar(app: &AppState) -> Result<(), JsValue> {
    let text = ElementBuilder::new("span")?.class("snackbar-text").build();
    let close = ElementBuilder::new("button")?
        .attr("type", "button")?
        .attr("aria-label", "Fechar")?
        .class("snackbar-close")
        .text("✕")
        .build();
    let snackbar = ElementBuilder::new("div")?
        .class("snackbar")
        .attr("role", "status")?
        .child(text.clone())?
        .child(close.clone())?
        .build();
    append_child(&body()?, &snackbar)?;

    let notifications = app.notifications.clone();
    on_click(&close, move |_| notifications.hide())?;

    let notifications = app.notifications.clone();
    let refresh = move || update_snackbar(&snackbar, &text, &notifications);
    refresh();
    app.notifications.subscribe(refresh);
    Ok(())
}

fn update_snackbar(
    snackbar: &Element,
    text: &Element,
    notifications: &crate::state::NotificationChannel,
) {
    match notifications.visible() {
        Some(message) => {
            set_text_content(text, &message.text);
            set_class_name(
                snackbar,
                &format!("snackbar visible {}", message.severity.css_class()),
            );
        }
        None => set_class_name(snackbar, "snackbar"),
    }
}

pub fn mount_loading_bar(app: &AppState) -> Result<(), JsValue> {
    let bar = ElementBuilder::new("div")?
        .class("loading-bar")
        .attr("role", "progressbar")?
        .build();
    append_child(&body()?, &bar)?;

    let loading = app.loading.clone();
    let refresh = move || {
        let class = if loading.is_loading() {
            "loading-bar active"
        } else {
            "loading-bar"
        };
        set_class_name(&bar, class);
    };
    refresh();
    app.loading.subscribe(refresh);
    Ok(())
}
