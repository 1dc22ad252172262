// ============================================================================
// REACTIVITY - Shared cells with change subscribers
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

/// Shared value plus subscribers. Clones share both the value and the subscribers.
pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl<T> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Reads the current value without cloning it
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    /// Replaces the value and notifies subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Mutates in place and notifies subscribers
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Handle that does not keep the value alive
    pub fn downgrade(&self) -> WeakReactiveState<T> {
        WeakReactiveState {
            value: Rc::downgrade(&self.value),
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    fn notify(&self) {
        // Snapshot first: a subscriber may subscribe again or read the value.
        let subscribers: Vec<Callback> = self.subscribers.borrow().iter().cloned().collect();
        for callback in subscribers {
            callback();
        }
    }
}

impl<T: Clone> ReactiveState<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

pub struct WeakReactiveState<T> {
    value: Weak<RefCell<T>>,
    subscribers: Weak<RefCell<Vec<Callback>>>,
}

impl<T> WeakReactiveState<T> {
    pub fn upgrade(&self) -> Option<ReactiveState<T>> {
        Some(ReactiveState {
            value: self.value.upgrade()?,
            subscribers: self.subscribers.upgrade()?,
        })
    }
}

impl<T: Default> Default for ReactiveState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
