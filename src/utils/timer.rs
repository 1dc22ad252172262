// ============================================================================
// TIMERS - One-shot timers behind a trait so they can run without a browser
// ============================================================================
// Dropping a `TimerHandle` cancels the timer, same as `gloo_timers::Timeout`.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Owning handle of a scheduled callback. Drop it to cancel.
pub struct TimerHandle {
    _inner: Box<dyn Any>,
}

impl TimerHandle {
    pub fn new<T: Any>(inner: T) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle;
}

/// `setTimeout` through gloo-timers
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct BrowserScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(gloo_timers::callback::Timeout::new(delay_ms, callback))
    }
}

struct ScheduledTask {
    id: u64,
    due_ms: u64,
    cancelled: Rc<Cell<bool>>,
    callback: Box<dyn FnOnce()>,
}

/// Sets the cancelled flag when the handle is dropped.
struct CancelOnDrop(Rc<Cell<bool>>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

/// Virtual-time scheduler. Nothing fires until `advance` is called.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    now_ms: Rc<Cell<u64>>,
    next_id: Rc<Cell<u64>>,
    tasks: Rc<RefCell<Vec<ScheduledTask>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Timers that are neither fired nor cancelled
    pub fn pending(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|task| !task.cancelled.get())
            .count()
    }

    /// Moves the clock forward, firing due callbacks in deadline order.
    pub fn advance(&self, delta_ms: u64) {
        let target = self.now_ms.get() + delta_ms;
        loop {
            // The borrow must end before the callback runs: callbacks reschedule.
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                tasks.retain(|task| !task.cancelled.get());
                let index = tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due_ms <= target)
                    .min_by_key(|(_, task)| (task.due_ms, task.id))
                    .map(|(index, _)| index);
                index.map(|index| tasks.remove(index))
            };

            match next {
                Some(task) => {
                    self.now_ms.set(task.due_ms);
                    task.cancelled.set(true);
                    (task.callback)();
                }
                None => break,
            }
        }
        self.now_ms.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ScheduledTask {
            id,
            due_ms: self.now_ms.get() + u64::from(delay_ms),
            cancelled: cancelled.clone(),
            callback,
        });
        TimerHandle::new(CancelOnDrop(cancelled))
    }
}
