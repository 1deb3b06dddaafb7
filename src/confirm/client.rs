use super::broker::BrokerRequest;
use super::dialog::DialogHandle;
use super::error::BrokerError;
use tokio::sync::{mpsc, oneshot};

/// Used when the caller does not supply a message.
pub const DEFAULT_MESSAGE: &str = "Are you sure you want to delete this item?";

/// A cloneable handle to the [`ConfirmationBroker`](super::ConfirmationBroker).
#[derive(Debug, Clone)]
pub struct ConfirmationClient {
    sender: mpsc::Sender<BrokerRequest>,
}

impl ConfirmationClient {
    pub fn new(sender: mpsc::Sender<BrokerRequest>) -> Self {
        Self { sender }
    }

    /// Asks the user and waits for the answer.
    #[tracing::instrument(skip(self))]
    pub async fn request_confirmation(&self, message: Option<&str>) -> Result<bool, BrokerError> {
        let (respond_to, response) = oneshot::channel();
        let message = message.unwrap_or(DEFAULT_MESSAGE).to_string();
        self.sender
            .send(BrokerRequest::Confirm {
                message,
                respond_to,
            })
            .await
            .map_err(|_| BrokerError::BrokerClosed)?;
        response.await.map_err(|_| BrokerError::BrokerDropped)
    }

    /// Mounts a dialog. Replaces any dialog mounted before.
    pub async fn mount_dialog(&self) -> Result<DialogHandle, BrokerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BrokerRequest::Mount { respond_to })
            .await
            .map_err(|_| BrokerError::BrokerClosed)?;
        response.await.map_err(|_| BrokerError::BrokerDropped)
    }
}
