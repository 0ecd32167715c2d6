use parking_lot::Mutex;
use std::fmt::Debug;
use tracing::warn;

/// Shows the blocking notice when a submission is stopped.
pub trait Notifier: Debug + Send + Sync {
    fn notify(&self, message: &str);
}

/// Emits the notice as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!(notice = message, "Form submission blocked");
    }
}

/// Keeps every notice in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    /// Drains the recorded notices.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}
