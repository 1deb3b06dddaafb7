use crate::framework::ResourceError;
use crate::model::{TodoId, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("login response did not include an access token")]
    MissingToken,
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(TodoId),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}
