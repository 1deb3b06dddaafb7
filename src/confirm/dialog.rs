use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// A question waiting for the mounted dialog to answer.
///
/// Dropping it without answering counts as a cancel, the same as closing the dialog.
#[derive(Debug)]
pub struct PendingConfirmation {
    message: String,
    responder: Option<oneshot::Sender<bool>>,
}

impl PendingConfirmation {
    pub(crate) fn new(message: String, responder: oneshot::Sender<bool>) -> Self {
        Self {
            message,
            responder: Some(responder),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn confirm(mut self) {
        self.resolve(true);
    }

    pub fn cancel(mut self) {
        self.resolve(false);
    }

    /// Answers with an arbitrary value.
    pub fn answer(mut self, confirmed: bool) {
        self.resolve(confirmed);
    }

    fn resolve(&mut self, confirmed: bool) {
        if let Some(responder) = self.responder.take() {
            debug!(confirmed, "Confirmation resolved");
            // The caller may have given up; nothing to do then.
            let _ = responder.send(confirmed);
        }
    }
}

impl Drop for PendingConfirmation {
    fn drop(&mut self) {
        self.resolve(false);
    }
}

/// The mounted dialog's end of the broker.
///
/// Only one dialog is mounted at a time. Dropping the handle unmounts it and the
/// broker goes back to its fallback prompt.
#[derive(Debug)]
pub struct DialogHandle {
    receiver: mpsc::UnboundedReceiver<PendingConfirmation>,
}

impl DialogHandle {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<PendingConfirmation>) -> Self {
        Self { receiver }
    }

    /// Next question, in the order callers asked. `None` once the broker is gone
    /// or another dialog replaced this one.
    pub async fn next(&mut self) -> Option<PendingConfirmation> {
        self.receiver.recv().await
    }
}
