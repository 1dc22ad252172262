// ============================================================================
// SGHSS VIDAPLUS - CLINIC FRONT-END (RUST + WASM, MVVM)
// ============================================================================
// - Views: functions that build DOM (no logic), wasm32 only
// - ViewModels: screen state + UI logic
// - Services: API communication only, over a swappable transport
// - State: shared Rc<RefCell> state
// - Models: structures shared with the backend
// ============================================================================

pub mod config;
pub mod models;
pub mod routing;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::app::App;

#[cfg(target_arch = "wasm32")]
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
    static RENDER_PENDING: Cell<bool> = Cell::new(false);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if config::CONFIG.is_logging_enabled() {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 SGHSS VidaPlus - Rust + WASM");

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });
    Ok(())
}

/// Queues one re-render on the next tick; further calls before it runs are
/// folded into it.
#[cfg(target_arch = "wasm32")]
pub fn schedule_render() {
    if RENDER_PENDING.with(|pending| pending.replace(true)) {
        return;
    }
    gloo_timers::callback::Timeout::new(0, || {
        RENDER_PENDING.with(|pending| pending.set(false));
        rerender_app();
    })
    .forget();
}

/// Full re-render of the mounted app
#[cfg(target_arch = "wasm32")]
pub fn rerender_app() {
    APP.with(|app_cell| match app_cell.try_borrow_mut() {
        Ok(mut app) => match app.as_mut() {
            Some(app) => {
                if let Err(e) = app.render() {
                    log::error!("❌ Re-render failed: {:?}", e);
                }
            }
            None => log::warn!("⚠️ App is not initialised yet"),
        },
        // Still inside a render; retry on the next tick
        Err(_) => schedule_render(),
    });
}
