//! Generic error handling utilities
//!
//! Provides unified error reporting across the queue, store and messaging
//! error types while keeping each domain's own error enum.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// User-actionable errors (an unknown entry id, a blank name) are shown to the
/// front desk verbatim. System errors (the store being unreachable) get a
/// generic line plus debug details.
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error carries a message meant for the operator
    fn is_user_actionable(&self) -> bool;

    /// The operator-facing message for user-actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use clinic_queue::core::error_handling::log_error_with_context;
/// # use clinic_queue::core::validation::ValidationError;
/// let error = ValidationError::missing("name");
/// log_error_with_context(&error, "Registering client");
/// // Logs: "Registering client: 'name' is required"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => {
            log::warn!("{}: {}", operation_context, user_msg);
        }
        _ => {
            log::error!("{} failed", operation_context);
        }
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Message to show an operator for a failed operation
pub fn operator_message<E: ContextualError + std::fmt::Display>(
    error: &E,
    operation_context: &str,
) -> String {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => user_msg.to_string(),
        _ => format!("{operation_context} failed; see log for details"),
    }
}
