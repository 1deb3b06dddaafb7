//! Notification surface.
//!
//! The resource layer reports every success (when asked to) and every failure
//! through a [`Notifier`]. Front-ends decide how a notification is rendered.

use std::sync::Mutex;

/// Receives user-facing success and error notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, text: &str);
    fn error(&self, text: &str);
}

/// Prints notifications to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, text: &str) {
        println!("✔ {text}");
    }

    fn error(&self, text: &str) {
        eprintln!("✖ {text}");
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Keeps every notification in memory, in order. Used by tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// The most recent notification, if any.
    pub fn last(&self) -> Option<Notification> {
        self.events().pop()
    }

    fn push(&self, notification: Notification) {
        if let Ok(mut events) = self.events.lock() {
            events.push(notification);
        }
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, text: &str) {
        self.push(Notification::Success(text.to_string()));
    }

    fn error(&self, text: &str) {
        self.push(Notification::Error(text.to_string()));
    }
}
