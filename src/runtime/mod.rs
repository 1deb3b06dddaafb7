//! Runtime orchestration and lifecycle management.
//!
//! This module wires the application together:
//!
//! - **Client wiring**: one shared `ResourceClient` behind every domain client
//! - **Actor lifecycle**: starting and shutting down the confirmation broker
//! - **Route guard**: deciding where an unauthenticated (or authenticated) user may go
//! - **Observability setup**: initializing tracing and logging
//!
//! # Main Components
//!
//! - [`AdminSystem`] - The orchestrator that owns the clients and background tasks
//! - [`Redirect`] - Outcome of [`AdminSystem::guard`]
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod admin_system;
pub mod guard;
pub mod tracing;

pub use self::admin_system::*;
pub use self::guard::*;
pub use self::tracing::*;
