// ============================================================================
// NOTIFICATION CHANNEL - Single-slot snackbar with auto-dismiss
// ============================================================================
// A new message replaces the current one and restarts the countdown. There
// is never more than one live timer, so an old timer cannot hide a newer
// message.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::state::ReactiveState;
use crate::utils::{Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "alert-info",
            Severity::Success => "alert-success",
            Severity::Warning => "alert-warning",
            Severity::Error => "alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub severity: Severity,
    pub visible: bool,
}

#[derive(Clone)]
pub struct NotificationChannel {
    current: ReactiveState<Option<NotificationMessage>>,
    timer: Rc<RefCell<Option<TimerHandle>>>,
    generation: Rc<Cell<u64>>,
    scheduler: Rc<dyn Scheduler>,
    duration_ms: u32,
}

impl NotificationChannel {
    pub fn new(scheduler: Rc<dyn Scheduler>, duration_ms: u32) -> Self {
        Self {
            current: ReactiveState::new(None),
            timer: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            scheduler,
            duration_ms,
        }
    }

    pub fn show(&self, text: impl Into<String>, severity: Severity) {
        let text = text.into();
        log::debug!("🔔 [{:?}] {}", severity, text);

        // Cancel the previous countdown before anything else
        self.timer.borrow_mut().take();

        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        self.current.set(Some(NotificationMessage {
            text,
            severity,
            visible: true,
        }));

        // Weak captures: the stored handle owns this callback
        let current = self.current.downgrade();
        let generations = Rc::downgrade(&self.generation);
        let handle = self.scheduler.schedule(
            self.duration_ms,
            Box::new(move || {
                let (Some(current), Some(generations)) = (current.upgrade(), generations.upgrade())
                else {
                    return;
                };
                // Ignore a callback that outlived its message
                if generations.get() == generation {
                    dismiss(&current);
                }
            }),
        );
        *self.timer.borrow_mut() = Some(handle);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(text, Severity::Info);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, Severity::Success);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.show(text, Severity::Warning);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, Severity::Error);
    }

    /// Hides the current message right away.
    pub fn hide(&self) {
        self.timer.borrow_mut().take();
        dismiss(&self.current);
    }

    pub fn current(&self) -> Option<NotificationMessage> {
        self.current.get()
    }

    /// The message on screen, if any
    pub fn visible(&self) -> Option<NotificationMessage> {
        self.current().filter(|message| message.visible)
    }

    pub fn subscribe<F: Fn() + 'static>(&self, callback: F) {
        self.current.subscribe(callback);
    }
}

fn dismiss(current: &ReactiveState<Option<NotificationMessage>>) {
    let visible = current.with(|m| m.as_ref().map_or(false, |m| m.visible));
    if visible {
        current.update(|message| {
            if let Some(message) = message.as_mut() {
                message.visible = false;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ManualScheduler;

    fn channel() -> (ManualScheduler, NotificationChannel) {
        let scheduler = ManualScheduler::new();
        let channel = NotificationChannel::new(Rc::new(scheduler.clone()), 6_000);
        (scheduler, channel)
    }

    #[test]
    fn auto_dismisses_after_six_seconds() {
        let (scheduler, channel) = channel();
        channel.success("Paciente salvo");

        scheduler.advance(5_999);
        assert_eq!(channel.visible().map(|m| m.text), Some("Paciente salvo".into()));

        scheduler.advance(1);
        assert_eq!(channel.visible(), None);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn second_message_restarts_the_countdown() {
        let (scheduler, channel) = channel();
        channel.show("primeira", Severity::Info);
        scheduler.advance(4_000);
        channel.show("segunda", Severity::Error);
        assert_eq!(scheduler.pending(), 1);

        // where the first timer would have fired
        scheduler.advance(2_000);
        let message = channel.visible().expect("second message still visible");
        assert_eq!(message.text, "segunda");
        assert_eq!(message.severity, Severity::Error);

        // 6s after the second show
        scheduler.advance(3_999);
        assert!(channel.visible().is_some());
        scheduler.advance(1);
        assert_eq!(channel.visible(), None);
    }

    #[test]
    fn back_to_back_shows_display_only_the_latest() {
        let (scheduler, channel) = channel();
        channel.show("m1", Severity::Warning);
        channel.show("m2", Severity::Success);

        let message = channel.visible().unwrap();
        assert_eq!((message.text.as_str(), message.severity), ("m2", Severity::Success));

        scheduler.advance(6_000);
        assert_eq!(channel.visible(), None);
    }

    #[test]
    fn pending_timer_does_not_keep_the_channel_alive() {
        let (scheduler, channel) = channel();
        channel.info("Sincronizando");
        assert_eq!(Rc::strong_count(&channel.generation), 1);

        let generation = Rc::downgrade(&channel.generation);
        drop(channel);
        assert!(generation.upgrade().is_none());
        // dropping the channel cancelled its countdown
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(6_000);
    }

    #[test]
    fn hide_is_immediate_and_cancels_the_timer() {
        let (scheduler, channel) = channel();
        channel.error("Falha");
        channel.hide();

        assert_eq!(channel.visible(), None);
        assert_eq!(channel.current().map(|m| m.visible), Some(false));
        assert_eq!(scheduler.pending(), 0);
    }
}
