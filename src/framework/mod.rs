//! Resource access framework.
//!
//! Every HTTP call the application makes goes through the [`ResourceClient`]
//! defined here. The module is split into the same layers the rest of the
//! crate relies on:
//!
//! - [`core`] - [`ResourceRequest`], [`Payload`] and the [`ResourceClient`] chokepoint
//! - [`transport`] - the [`Transport`] seam and its `reqwest` implementation
//! - [`error`] - [`ResourceError`] and the typed [`ApiErrorBody`] contract
//! - [`notify`] - the [`Notifier`] surface for success/error toasts
//!
//! # Testing
//!
//! See [`mock`] for a scripted transport that lets clients be tested without a server.

pub mod core;
pub mod error;
pub mod mock;
pub mod notify;
pub mod transport;

// Re-export core types for convenience
pub use self::core::*;
pub use error::{ApiErrorBody, ResourceError};
pub use notify::{ConsoleNotifier, Notification, Notifier, RecordingNotifier};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
