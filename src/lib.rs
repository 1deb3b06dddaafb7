//! # Todo Admin
//!
//! > **An async client for the todo administration API.**
//!
//! Everything the admin front-end does over HTTP goes through this crate:
//! signing in, keeping the bearer token, reading and editing the profile, and
//! listing, creating, editing and deleting todos.
//!
//! ## 🏗️ Design
//!
//! ### One chokepoint for every request
//! Domain clients describe calls as [`ResourceRequest`](framework::ResourceRequest)s
//! and hand them to a single [`ResourceClient`](framework::ResourceClient). It
//! builds the URL, attaches the token, picks the content type, asks before any
//! DELETE, and reports success or failure through a [`Notifier`](framework::Notifier).
//!
//! ### Confirmations as an actor
//! "Are you sure?" is a service, not a global. The [`confirm`] broker runs in
//! its own task; any call site can `await` an answer, and whichever front-end
//! surface is mounted (a dialog, or a terminal prompt) supplies it. Concurrent
//! requests queue up and each gets its own answer.
//!
//! ### Debounced, cancellable listings
//! A [`Debouncer`](debounce::Debouncer) settles a changing search query, and a
//! [`TodoFeed`](clients::TodoFeed) refetches on every settled change while
//! dropping any fetch it superseded.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`]: `ResourceClient`, the `Transport` seam, errors, notifications, test mocks.
//! - [`confirm`]: the confirmation broker.
//! - [`session`]: auth token and its stores.
//! - [`model`]: DTOs for users, todos, auth and list queries.
//! - [`clients`]: `AuthClient`, `UserClient`, `TodoClient`, `TodoFeed`.
//! - [`form`], [`debounce`]: front-end state helpers.
//! - [`config`]: TOML and environment configuration.
//! - [`runtime`]: `AdminSystem` wiring, the route guard, tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! export TODO_ADMIN_BASE_API=https://todo.example.com/api
//! RUST_LOG=info cargo run -- login you@example.com --password secret --remember
//! cargo run -- todos list --search report --filter 5d
//! ```

pub mod clients;
pub mod config;
pub mod confirm;
pub mod debounce;
pub mod form;
pub mod framework;
pub mod model;
pub mod runtime;
pub mod session;
