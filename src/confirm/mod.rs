//! # Confirmation Broker
//!
//! Turns "ask the user yes/no" into an awaitable `bool` that any call site can
//! request, while the answer comes from whatever front-end surface is mounted.
//!
//! ## Key Types
//!
//! - [`ConfirmationBroker`]: The actor. Owns the mounted dialog (if any) and the fallback prompt.
//! - [`ConfirmationClient`]: Cloneable handle used by call sites.
//! - [`DialogHandle`]: Given to a mounted dialog; yields [`PendingConfirmation`]s in FIFO order.
//! - [`Prompt`]: Synchronous fallback used while no dialog is mounted.
//!
//! # Architecture Note
//! Every request carries its own `oneshot` responder. Several callers can ask
//! at once; each is answered exactly once, in the order they asked.

mod broker;
mod client;
mod dialog;
mod error;
mod prompt;

pub use broker::{BrokerRequest, BrokerStats, ConfirmationBroker};
pub use client::{ConfirmationClient, DEFAULT_MESSAGE};
pub use dialog::{DialogHandle, PendingConfirmation};
pub use error::BrokerError;
pub use prompt::{FixedPrompt, Prompt, StdinPrompt};

/// Creates a broker and its client. Spawn [`ConfirmationBroker::run`] to start answering.
pub fn new(buffer_size: usize) -> (ConfirmationBroker, ConfirmationClient) {
    ConfirmationBroker::new(buffer_size)
}
