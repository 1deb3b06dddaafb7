//! Domain-specific clients built on the shared [`ResourceClient`](crate::framework::ResourceClient).

pub mod api_client;
pub mod auth_client;
pub mod error;
pub mod todo_client;
pub mod todo_feed;
pub mod user_client;

pub use api_client::ApiClient;
pub use auth_client::AuthClient;
pub use error::{AuthError, TodoError, UserError};
pub use todo_client::TodoClient;
pub use todo_feed::{FeedState, TodoFeed};
pub use user_client::UserClient;
