// ============================================================================
// LOADING STATE - Global "request in flight" indicator
// ============================================================================
// Counts in-flight requests instead of toggling a single boolean, so a fast
// request settling while a slow one is still pending keeps the bar visible.
// ============================================================================

use crate::state::ReactiveState;

#[derive(Clone, Default)]
pub struct LoadingState {
    in_flight: ReactiveState<usize>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Marks one request as started; dropping the guard marks it settled.
    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.update(|count| *count += 1);
        LoadingGuard {
            state: self.clone(),
        }
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.in_flight.subscribe(callback);
    }
}

#[must_use = "the request counts as settled as soon as the guard is dropped"]
pub struct LoadingGuard {
    state: LoadingState,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state
            .in_flight
            .update(|count| *count = count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_loading_until_the_last_request_settles() {
        let loading = LoadingState::new();
        assert!(!loading.is_loading());

        let first = loading.begin();
        let second = loading.begin();
        let third = loading.begin();

        // settle out of order
        drop(second);
        assert!(loading.is_loading());
        drop(first);
        assert!(loading.is_loading());
        assert_eq!(loading.in_flight(), 1);
        drop(third);
        assert!(!loading.is_loading());
    }
}
