//! Sender used when outbound messaging is disabled

use async_trait::async_trait;

use crate::messaging::error::MessagingResult;
use crate::messaging::traits::NotificationSender;

#[derive(Debug, Default, Clone)]
pub struct NoopSender;

#[async_trait]
impl NotificationSender for NoopSender {
    async fn send(&self, contact: &str, sequence_number: u64, _name: &str) -> MessagingResult<()> {
        log::debug!(
            "Messaging disabled; not notifying {} about #{}",
            contact,
            sequence_number
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "disabled"
    }
}
