// ============================================================================
// REQUEST STATE - data / loading / error for one screen-level call
// ============================================================================
// Only the latest `execute` may write its outcome. After `dispose()` (the
// screen went away) nothing is written at all.
// ============================================================================

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use crate::services::ApiError;
use crate::state::ReactiveState;

pub struct RequestState<T> {
    data: ReactiveState<Option<T>>,
    loading: ReactiveState<bool>,
    error: ReactiveState<Option<ApiError>>,
    initial: Option<T>,
    generation: Rc<Cell<u64>>,
    alive: Rc<Cell<bool>>,
}

impl<T: Clone> Clone for RequestState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading.clone(),
            error: self.error.clone(),
            initial: self.initial.clone(),
            generation: self.generation.clone(),
            alive: self.alive.clone(),
        }
    }
}

impl<T: Clone + 'static> RequestState<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            data: ReactiveState::new(initial.clone()),
            loading: ReactiveState::new(false),
            error: ReactiveState::new(None),
            initial,
            generation: Rc::new(Cell::new(0)),
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn data(&self) -> Option<T> {
        self.data.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.error.get()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Runs `call` and records its outcome; the outcome is also returned.
    pub async fn execute<F>(&self, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        if self.alive.get() {
            self.error.set(None);
            self.loading.set(true);
        }

        let result = call.await;

        if !self.alive.get() || self.generation.get() != generation {
            log::debug!("🗑️ Discarding a stale request result");
            return result;
        }

        match &result {
            Ok(value) => self.data.set(Some(value.clone())),
            Err(e) => self.error.set(Some(e.clone())),
        }
        self.loading.set(false);
        result
    }

    /// Local edit of the loaded data (e.g. after a delete).
    pub fn set_data(&self, data: Option<T>) {
        self.data.set(data);
    }

    pub fn reset(&self) {
        self.generation.set(self.generation.get() + 1);
        self.data.set(self.initial.clone());
        self.error.set(None);
        self.loading.set(false);
    }

    /// The owning screen is gone; later results are dropped.
    pub fn dispose(&self) {
        self.alive.set(false);
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        let callback: Rc<dyn Fn()> = Rc::new(callback);
        let on_data = callback.clone();
        let on_loading = callback.clone();
        self.data.subscribe(move || on_data());
        self.loading.subscribe(move || on_loading());
        self.error.subscribe(move || callback());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;

    #[test]
    fn records_success_and_failure() {
        let state: RequestState<Vec<u32>> = RequestState::new(Some(Vec::new()));

        let result = block_on(state.execute(async { Ok(vec![1, 2]) }));
        assert_eq!(result, Ok(vec![1, 2]));
        assert_eq!(state.data(), Some(vec![1, 2]));
        assert!(!state.is_loading());

        let failure = ApiError::NetworkUnavailable("offline".into());
        let _ = block_on(state.execute(async { Err(failure.clone()) }));
        assert_eq!(state.error(), Some(failure));
        // data from the previous success is kept
        assert_eq!(state.data(), Some(vec![1, 2]));

        state.reset();
        assert_eq!(state.data(), Some(Vec::new()));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn older_request_settling_last_is_ignored() {
        let state: RequestState<&'static str> = RequestState::new(None);
        let (slow_tx, slow_rx) = oneshot::channel::<&'static str>();
        let (fast_tx, fast_rx) = oneshot::channel::<&'static str>();

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        let first = state.clone();
        spawner
            .spawn_local(async move {
                let _ = first
                    .execute(async { slow_rx.await.map_err(|e| ApiError::NetworkUnavailable(e.to_string())) })
                    .await;
            })
            .unwrap();
        pool.run_until_stalled();
        let second = state.clone();
        spawner
            .spawn_local(async move {
                let _ = second
                    .execute(async { fast_rx.await.map_err(|e| ApiError::NetworkUnavailable(e.to_string())) })
                    .await;
            })
            .unwrap();
        pool.run_until_stalled();
        assert!(state.is_loading());

        fast_tx.send("novo").unwrap();
        pool.run_until_stalled();
        slow_tx.send("antigo").unwrap();
        pool.run_until_stalled();

        assert_eq!(state.data(), Some("novo"));
        assert!(!state.is_loading());
    }

    #[test]
    fn disposed_state_drops_late_results() {
        let state: RequestState<u32> = RequestState::new(None);
        let (tx, rx) = oneshot::channel::<u32>();
        let mut pool = LocalPool::new();
        let pending = state.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = pending
                    .execute(async { rx.await.map_err(|e| ApiError::NetworkUnavailable(e.to_string())) })
                    .await;
            })
            .unwrap();
        pool.run_until_stalled();

        state.dispose();
        tx.send(7).unwrap();
        pool.run_until_stalled();

        assert_eq!(state.data(), None);
        assert!(!state.is_alive());
    }
}
