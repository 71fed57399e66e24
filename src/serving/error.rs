//! Queue Error Types

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::serving::entry::EntryId;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("{message}")]
    NotFound { id: EntryId, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Entry store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl QueueError {
    pub fn not_found(id: EntryId) -> Self {
        QueueError::NotFound {
            id,
            message: format!("Entry {id} not found"),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        QueueError::Validation(ValidationError::new(message))
    }
}

impl From<StoreError> for QueueError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable { message } => QueueError::StoreUnavailable { message },
        }
    }
}

impl ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, QueueError::StoreUnavailable { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            QueueError::NotFound { message, .. } => Some(message),
            QueueError::Validation(error) => Some(error.message()),
            QueueError::StoreUnavailable { .. } => None,
        }
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;
