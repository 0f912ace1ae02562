use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::ProductId;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Product out of stock: {0}")]
    OutOfStock(ProductId),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Product rejected: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ProductError {
    pub(crate) fn from_framework(id: ProductId, error: FrameworkError) -> Self {
        match error {
            FrameworkError::NotFound(_) => Self::NotFound(id),
            FrameworkError::Rejected(reason) => Self::Rejected(reason),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<FrameworkError> for ProductError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::Rejected(reason) => Self::Rejected(reason),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
