// ============================================================================
// ROUTE GUARD - Blocks protected screens until authentication is known
// ============================================================================
// The guard re-reads durable storage itself rather than trusting the
// session context: the context may not have hydrated yet when a guarded
// screen mounts.
// ============================================================================

use crate::routing::{login_location, Navigator};
use crate::state::SessionContext;
use crate::stores::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authenticated,
    Unauthenticated,
}

/// What the guarded slot should display right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView<T> {
    /// Neutral spinner, no protected content
    Loading,
    Content(T),
    /// A redirect to login was issued; render nothing
    Redirected(String),
}

pub struct RouteGuard {
    requested: String,
    state: GuardState,
    redirect: Option<String>,
}

impl RouteGuard {
    /// `requested` is the path (and query) the user tried to open.
    pub fn new(requested: impl Into<String>) -> Self {
        Self {
            requested: requested.into(),
            state: GuardState::Checking,
            redirect: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// Settles `Checking` into one of the terminal states. Calling it again
    /// after that is a no-op.
    pub fn resolve(
        &mut self,
        store: &SessionStore,
        context: &SessionContext,
        navigator: &dyn Navigator,
    ) -> GuardState {
        if self.state != GuardState::Checking {
            return self.state;
        }

        match store.load() {
            Some(session) => {
                log::debug!("🔓 Guard: {} allowed for {}", self.requested, session.user.email);
                if context.current().as_ref() != Some(&session) {
                    context.set_session(Some(session));
                }
                self.state = GuardState::Authenticated;
            }
            None => {
                let target = login_location(Some(&self.requested), false);
                log::info!("🔒 Guard: no session, redirecting to {}", target);
                context.reset();
                navigator.navigate(&target);
                self.redirect = Some(target);
                self.state = GuardState::Unauthenticated;
            }
        }
        self.state
    }

    /// Produces protected content only once authenticated; `content` is not
    /// called otherwise.
    pub fn view<T>(&self, content: impl FnOnce() -> T) -> GuardView<T> {
        match self.state {
            GuardState::Checking => GuardView::Loading,
            GuardState::Authenticated => GuardView::Content(content()),
            GuardState::Unauthenticated => {
                GuardView::Redirected(self.redirect.clone().unwrap_or_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Session, User};
    use crate::routing::{MemoryNavigator, NavigationEvent};
    use crate::utils::{KeyValueStorage, MemoryStorage};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixture {
        storage: MemoryStorage,
        navigator: MemoryNavigator,
        store: SessionStore,
        context: SessionContext,
    }

    fn fixture(location: &str) -> Fixture {
        let storage = MemoryStorage::new();
        let navigator = MemoryNavigator::new(location);
        let store = SessionStore::new(Rc::new(storage.clone()));
        let context = SessionContext::new(store.clone(), Rc::new(navigator.clone()));
        Fixture {
            storage,
            navigator,
            store,
            context,
        }
    }

    fn session() -> Session {
        Session::new(
            User {
                id: 1,
                name: "Administrador".into(),
                email: "teste@vidaplus.com".into(),
                role: Role::Admin,
            },
            "mock-jwt-token",
        )
    }

    #[test]
    fn stored_session_authenticates_without_early_render() {
        let f = fixture("/pacientes");
        f.store.save(&session()).unwrap();
        let renders = Cell::new(0);

        let mut guard = RouteGuard::new("/pacientes");
        assert_eq!(guard.state(), GuardState::Checking);
        assert_eq!(guard.view(|| renders.set(renders.get() + 1)), GuardView::Loading);
        assert_eq!(renders.get(), 0);

        let state = guard.resolve(&f.store, &f.context, &f.navigator);
        assert_eq!(state, GuardState::Authenticated);
        assert_eq!(guard.view(|| renders.set(renders.get() + 1)), GuardView::Content(()));
        assert_eq!(renders.get(), 1);

        // the context is populated even though it was never hydrated
        assert_eq!(f.context.current(), Some(session()));
        assert!(f.navigator.history().is_empty());
    }

    #[test]
    fn missing_token_redirects_with_the_requested_path() {
        let f = fixture("/consultas");
        let mut guard = RouteGuard::new("/consultas");

        assert_eq!(
            guard.resolve(&f.store, &f.context, &f.navigator),
            GuardState::Unauthenticated
        );

        let last = f.navigator.last().expect("redirect issued");
        assert!(matches!(last, NavigationEvent::Soft(_)));
        assert!(last.location().starts_with("/login?"));
        assert!(last.location().contains("redirect=%2Fconsultas"));
        assert_eq!(
            guard.view(|| "protegido"),
            GuardView::Redirected("/login?redirect=%2Fconsultas".into())
        );
    }

    #[test]
    fn unparsable_profile_counts_as_signed_out() {
        let f = fixture("/telemedicina");
        f.storage.set_item("token", "mock-jwt-token").unwrap();
        f.storage.set_item("user", "{\"id\":").unwrap();

        let mut guard = RouteGuard::new("/telemedicina");
        assert_eq!(
            guard.resolve(&f.store, &f.context, &f.navigator),
            GuardState::Unauthenticated
        );
        assert!(f.storage.is_empty());
    }

    #[test]
    fn resolve_is_terminal() {
        let f = fixture("/");
        let mut guard = RouteGuard::new("/");
        guard.resolve(&f.store, &f.context, &f.navigator);

        // a session appearing later does not flip an already redirected guard
        f.store.save(&session()).unwrap();
        assert_eq!(
            guard.resolve(&f.store, &f.context, &f.navigator),
            GuardState::Unauthenticated
        );
        assert_eq!(f.navigator.history().len(), 1);
    }
}
