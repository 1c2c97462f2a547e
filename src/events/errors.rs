//! # Event Errors

use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::forms::{FormDefinitionError, ValidationErrors};

/// Result type for event operations
pub type EventResult<T> = Result<T, EventError>;

#[derive(Debug, Clone, Error)]
pub enum EventError {
    #[error("Event with ID {0} not found")]
    EventNotFound(Uuid),

    /// Registration form assignment not found
    #[error("EventCustomField with ID {0} not found")]
    FormNotFound(Uuid),

    #[error("Participant with ID {0} not found")]
    ParticipantNotFound(Uuid),

    /// Some custom field ids do not exist
    #[error("Invalid CustomField IDs: {}", join_ids(.0))]
    InvalidFieldIds(Vec<Uuid>),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid form: {0}")]
    InvalidForm(#[from] FormDefinitionError),

    /// Submission rejected; carries every violation
    #[error("Registration rejected:\n{0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl EventError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            EventError::InvalidFieldIds(_)
            | EventError::InvalidRequest(_)
            | EventError::InvalidForm(_)
            | EventError::ValidationFailed(_) => 400,

            EventError::EventNotFound(_)
            | EventError::FormNotFound(_)
            | EventError::ParticipantNotFound(_) => 404,

            EventError::Auth(e) => e.status_code(),

            EventError::Encoding(_) | EventError::StorageError(_) => 500,
        }
    }

    /// One message per problem, for client error payloads
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            EventError::ValidationFailed(errors) => Some(errors.messages()),
            _ => None,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EventError::InvalidRequest(message.into())
    }
}
