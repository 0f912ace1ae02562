use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("No machines found")]
    NoMachinesFound,
    #[error("Machine rejected: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for MachineError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::Rejected(reason) => Self::Rejected(reason),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
