//! Traits for outbound client notifications

use async_trait::async_trait;

use crate::messaging::error::MessagingResult;

/// Delivers the "you are registered" message to a client
///
/// Delivery is best effort. The queue service logs a failure and reports it
/// to the registering caller as a boolean; it never undoes the registration.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, contact: &str, sequence_number: u64, name: &str) -> MessagingResult<()>;

    /// Short name used in log lines
    fn channel_name(&self) -> &str;
}
