//! Data transfer objects exchanged with the todo API.

pub mod auth;
pub mod query;
pub mod todo;
pub mod user;

pub use auth::*;
pub use query::*;
pub use todo::*;
pub use user::*;
