use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::UserId;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(UserId),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl UserError {
    pub(crate) fn from_framework(id: UserId, error: FrameworkError) -> Self {
        match error {
            FrameworkError::NotFound(_) => Self::NotFound(id),
            other => Self::from(other),
        }
    }
}

impl From<FrameworkError> for UserError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::Rejected(reason) => Self::ValidationError(reason),
            FrameworkError::Conflict(email) => Self::AlreadyExists(email),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
