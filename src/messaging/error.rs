//! Messaging Error Types

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("Gateway rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Gateway request failed: {message}")]
    Transport { message: String },

    #[error("Invalid messaging configuration: {message}")]
    InvalidConfig { message: String },
}

impl MessagingError {
    /// Whether another attempt could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            MessagingError::Transport { .. } => true,
            MessagingError::Rejected { status, .. } => *status == 429 || *status >= 500,
            MessagingError::InvalidConfig { .. } => false,
        }
    }
}

impl From<reqwest::Error> for MessagingError {
    fn from(error: reqwest::Error) -> Self {
        MessagingError::Transport {
            message: error.to_string(),
        }
    }
}

/// Result type for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let server_error = MessagingError::Rejected {
            status: 503,
            body: String::new(),
        };
        let throttled = MessagingError::Rejected {
            status: 429,
            body: String::new(),
        };
        let bad_number = MessagingError::Rejected {
            status: 400,
            body: "invalid number".to_string(),
        };

        assert!(server_error.is_transient());
        assert!(throttled.is_transient());
        assert!(!bad_number.is_transient());
        assert!(MessagingError::Transport {
            message: "timeout".to_string()
        }
        .is_transient());
    }
}
