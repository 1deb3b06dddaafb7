use super::client::ConfirmationClient;
use super::dialog::{DialogHandle, PendingConfirmation};
use super::prompt::Prompt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Messages accepted by the [`ConfirmationBroker`].
#[derive(Debug)]
pub enum BrokerRequest {
    Confirm {
        message: String,
        respond_to: oneshot::Sender<bool>,
    },
    Mount {
        respond_to: oneshot::Sender<DialogHandle>,
    },
}

/// How many requests the broker answered, and by which route.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BrokerStats {
    /// Handed to a mounted dialog.
    pub forwarded: usize,
    /// Answered by the fallback prompt.
    pub prompted: usize,
}

/// The actor that routes confirmation requests to whoever can answer them.
///
/// # Concurrency Model
/// Requests are processed one at a time, in arrival order. With a dialog
/// mounted, each request is forwarded immediately and the dialog answers at its
/// own pace through the request's own responder. Without one, the fallback
/// [`Prompt`] runs on the blocking pool and the broker waits for it, so terminal
/// prompts never interleave.
pub struct ConfirmationBroker {
    receiver: mpsc::Receiver<BrokerRequest>,
    dialog: Option<mpsc::UnboundedSender<PendingConfirmation>>,
}

impl ConfirmationBroker {
    pub fn new(buffer_size: usize) -> (Self, ConfirmationClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let broker = Self {
            receiver,
            dialog: None,
        };
        (broker, ConfirmationClient::new(sender))
    }

    /// Runs the event loop until every [`ConfirmationClient`] is dropped.
    ///
    /// The fallback `prompt` is injected here rather than in `new` so the
    /// front-end can be chosen after the clients have been handed out.
    pub async fn run(mut self, prompt: Arc<dyn Prompt>) -> BrokerStats {
        info!("Confirmation broker started");
        let mut stats = BrokerStats::default();

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BrokerRequest::Mount { respond_to } => {
                    let (sender, receiver) = mpsc::unbounded_channel();
                    if self.dialog.replace(sender).is_some() {
                        debug!("Replacing mounted dialog");
                    }
                    info!("Dialog mounted");
                    if respond_to.send(DialogHandle::new(receiver)).is_err() {
                        warn!("Mount requester went away");
                        self.dialog = None;
                    }
                }
                BrokerRequest::Confirm {
                    message,
                    respond_to,
                } => {
                    debug!(%message, "Confirm");
                    let pending = PendingConfirmation::new(message, respond_to);

                    let Some(pending) = self.forward(pending) else {
                        stats.forwarded += 1;
                        continue;
                    };

                    let prompt = prompt.clone();
                    let message = pending.message().to_string();
                    let confirmed = tokio::task::spawn_blocking(move || prompt.confirm(&message))
                        .await
                        .unwrap_or_else(|e| {
                            warn!(error = %e, "Prompt failed");
                            false
                        });
                    pending.answer(confirmed);
                    stats.prompted += 1;
                }
            }
        }

        info!(forwarded = stats.forwarded, prompted = stats.prompted, "Shutdown");
        stats
    }

    /// Hands the request to the mounted dialog. Gives it back if there is none.
    fn forward(&mut self, pending: PendingConfirmation) -> Option<PendingConfirmation> {
        let dialog = self.dialog.as_ref()?;
        match dialog.send(pending) {
            Ok(()) => None,
            Err(mpsc::error::SendError(pending)) => {
                info!("Dialog unmounted, using fallback prompt");
                self.dialog = None;
                Some(pending)
            }
        }
    }
}
