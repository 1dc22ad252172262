// ============================================================================
// SESSION CONTEXT - Page-wide signed-in user
// ============================================================================
// Handed to every screen by cloning (all clones share the same cell).
// Storage writes go through the `SessionStore`.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::models::{Session, User};
use crate::routing::Navigator;
use crate::state::ReactiveState;
use crate::stores::SessionStore;
use crate::utils::{StorageError, LOGIN_PATH};

#[derive(Clone)]
pub struct SessionContext {
    session: ReactiveState<Option<Session>>,
    store: SessionStore,
    navigator: Rc<dyn Navigator>,
    hydrated: Rc<Cell<bool>>,
}

impl SessionContext {
    pub fn new(store: SessionStore, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            session: ReactiveState::new(None),
            store,
            navigator,
            hydrated: Rc::new(Cell::new(false)),
        }
    }

    /// Restores the persisted session. Runs once per page; later calls are no-ops.
    pub fn hydrate(&self) {
        if self.hydrated.replace(true) {
            return;
        }

        match self.store.load() {
            Some(session) => {
                log::info!("✅ Session restored for {}", session.user.email);
                self.session.set(Some(session));
            }
            None => log::info!("ℹ️ No persisted session"),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.get()
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|session| session.as_ref().map(|s| s.user.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(Option::is_some)
    }

    /// Persists and publishes a new session (after login).
    pub fn sign_in(&self, session: Session) -> Result<(), StorageError> {
        self.store.save(&session)?;
        self.session.set(Some(session));
        Ok(())
    }

    /// Publishes a session already present in storage (route guard re-check).
    pub fn set_session(&self, session: Option<Session>) {
        self.session.set(session);
    }

    /// Drops the in-memory session without navigating.
    pub fn reset(&self) {
        if self.is_authenticated() {
            self.session.set(None);
        }
    }

    /// Clears storage and memory, then reloads on the login screen.
    pub fn logout(&self) {
        log::info!("🚪 Logout");
        self.store.clear();
        self.session.set(None);
        self.navigator.hard_redirect(LOGIN_PATH);
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.session.subscribe(callback);
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
