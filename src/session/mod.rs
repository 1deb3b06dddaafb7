//! Auth token persistence.
//!
//! The bearer token issued at login is kept in a [`TokenStore`] under a
//! configured name. It is read on every request and removed at logout.

mod error;
mod store;
mod token;

pub use error::TokenStoreError;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{AuthToken, REMEMBER_ME_DAYS, SESSION_DAYS};
