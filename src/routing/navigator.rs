// ============================================================================
// NAVIGATOR - Soft navigation and full-page redirects
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

/// How the app moves between screens.
///
/// `navigate` is a client-side route change that keeps in-memory state.
/// `hard_redirect` reloads the page, dropping everything held in memory.
pub trait Navigator {
    /// Path plus query string, e.g. `/consultas?status=agendada`
    fn current_location(&self) -> String;
    fn navigate(&self, location: &str);
    fn hard_redirect(&self, location: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Soft(String),
    Hard(String),
}

impl NavigationEvent {
    pub fn location(&self) -> &str {
        match self {
            NavigationEvent::Soft(location) | NavigationEvent::Hard(location) => location,
        }
    }
}

/// Records navigations instead of touching `window.location`.
#[derive(Clone)]
pub struct MemoryNavigator {
    current: Rc<RefCell<String>>,
    history: Rc<RefCell<Vec<NavigationEvent>>>,
}

impl MemoryNavigator {
    pub fn new(initial: &str) -> Self {
        Self {
            current: Rc::new(RefCell::new(initial.to_string())),
            history: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn history(&self) -> Vec<NavigationEvent> {
        self.history.borrow().clone()
    }

    pub fn last(&self) -> Option<NavigationEvent> {
        self.history.borrow().last().cloned()
    }

    pub fn hard_redirects(&self) -> Vec<String> {
        self.history
            .borrow()
            .iter()
            .filter_map(|event| match event {
                NavigationEvent::Hard(location) => Some(location.clone()),
                NavigationEvent::Soft(_) => None,
            })
            .collect()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn current_location(&self) -> String {
        self.current.borrow().clone()
    }

    fn navigate(&self, location: &str) {
        *self.current.borrow_mut() = location.to_string();
        self.history
            .borrow_mut()
            .push(NavigationEvent::Soft(location.to_string()));
    }

    fn hard_redirect(&self, location: &str) {
        *self.current.borrow_mut() = location.to_string();
        self.history
            .borrow_mut()
            .push(NavigationEvent::Hard(location.to_string()));
    }
}

/// `history.pushState` for soft navigation, `location.href` for hard redirects.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Default)]
pub struct BrowserNavigator {
    on_change: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

#[cfg(target_arch = "wasm32")]
impl BrowserNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every soft navigation (the app re-renders from here).
    pub fn set_on_change<F: Fn() + 'static>(&self, callback: F) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }
}

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn current_location(&self) -> String {
        web_sys::window()
            .map(|w| w.location())
            .map(|location| {
                let path = location.pathname().unwrap_or_else(|_| "/".to_string());
                let search = location.search().unwrap_or_default();
                format!("{}{}", path, search)
            })
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, location: &str) {
        log::debug!("🧭 navigate -> {}", location);
        let pushed = web_sys::window()
            .and_then(|w| w.history().ok())
            .map(|history| {
                history
                    .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(location))
                    .is_ok()
            })
            .unwrap_or(false);

        if !pushed {
            log::warn!("⚠️ pushState failed, falling back to full navigation");
            self.hard_redirect(location);
            return;
        }

        // Clone out of the cell: the callback may install a new listener.
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    fn hard_redirect(&self, location: &str) {
        log::info!("🔄 Full navigation -> {}", location);
        if let Some(window) = web_sys::window() {
            if window.location().set_href(location).is_err() {
                log::error!("❌ Could not navigate to {}", location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_navigator_records_both_kinds() {
        let navigator = MemoryNavigator::new("/pacientes");
        navigator.navigate("/consultas");
        navigator.hard_redirect("/login?expired=true");

        assert_eq!(navigator.current_location(), "/login?expired=true");
        assert_eq!(
            navigator.history(),
            vec![
                NavigationEvent::Soft("/consultas".into()),
                NavigationEvent::Hard("/login?expired=true".into()),
            ]
        );
        assert_eq!(navigator.hard_redirects(), vec!["/login?expired=true".to_string()]);
    }
}
