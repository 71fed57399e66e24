//! AsyncNotificationManager implementation
//!
//! Fan-out of events to any number of subscribers over unbounded channels.
//! Publishing never blocks on a slow subscriber; subscribers whose receiver
//! has been dropped are pruned on the next publish.

use crate::notifications::error::NotificationError;
use crate::notifications::event::{Event, EventFilter};
use crate::notifications::traits::SubscriberStatistics;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

// Undelivered events per subscriber before the manager starts warning
const HIGH_WATER_MARK: usize = 10000;

struct SubscriberInfo {
    filter: EventFilter,
    source: String,
    sender: UnboundedSender<Event>,
    statistics: Arc<SubscriberStatistics>,
}

/// Receiving half of a subscription
#[derive(Debug)]
pub struct EventReceiver {
    receiver: UnboundedReceiver<Event>,
    statistics: Arc<SubscriberStatistics>,
}

impl EventReceiver {
    /// Wait for the next event; `None` once the subscription is gone
    pub async fn recv(&mut self) -> Option<Event> {
        let event = self.receiver.recv().await?;
        self.statistics.decrement_queue_size();
        self.statistics.record_message_processed();
        Some(event)
    }

    /// Take an already delivered event without waiting
    pub fn try_recv(&mut self) -> Option<Event> {
        let event = self.receiver.try_recv().ok()?;
        self.statistics.decrement_queue_size();
        self.statistics.record_message_processed();
        Some(event)
    }
}

#[derive(Default)]
pub struct AsyncNotificationManager {
    subscribers: HashMap<String, SubscriberInfo>,
}

impl AsyncNotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        subscriber_id: String,
        filter: EventFilter,
        source: String,
    ) -> EventReceiver {
        let (sender, receiver) = unbounded_channel();
        let statistics = Arc::new(SubscriberStatistics::new());

        let subscriber_info = SubscriberInfo {
            filter,
            source: source.clone(),
            sender,
            statistics: Arc::clone(&statistics),
        };

        if let Some(existing) = self.subscribers.insert(subscriber_id.clone(), subscriber_info) {
            log::warn!(
                "Subscriber '{}' replaced existing subscription (source: {} -> {})",
                subscriber_id,
                existing.source,
                source
            );
        } else {
            log::debug!("Subscriber '{}' registered (source: {})", subscriber_id, source);
        }

        EventReceiver {
            receiver,
            statistics,
        }
    }

    /// Remove a subscription; its receiver sees the end of the stream
    pub fn unsubscribe(&mut self, subscriber_id: &str) -> bool {
        self.subscribers.remove(subscriber_id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_subscriber(&self, subscriber_id: &str) -> bool {
        self.subscribers.contains_key(subscriber_id)
    }

    pub fn get_subscriber_statistics(&self, subscriber_id: &str) -> Option<&SubscriberStatistics> {
        self.subscribers
            .get(subscriber_id)
            .map(|info| info.statistics.as_ref())
    }

    pub fn check_high_water_marks(&self) -> Vec<String> {
        self.subscribers
            .iter()
            .filter(|(_, info)| info.statistics.queue_size() >= HIGH_WATER_MARK)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub async fn publish(&mut self, event: Event) -> Result<(), NotificationError> {
        let mut failed_subscribers = Vec::new();

        for (subscriber_id, subscriber_info) in &self.subscribers {
            if !subscriber_info.filter.accepts(&event) {
                continue;
            }

            subscriber_info.statistics.increment_queue_size();
            if subscriber_info.sender.send(event.clone()).is_err() {
                // Receiver dropped
                failed_subscribers.push(subscriber_id.clone());
            } else if subscriber_info.statistics.queue_size() == HIGH_WATER_MARK {
                log::warn!(
                    "Subscriber '{}' (source: {}) has {} undelivered events",
                    subscriber_id,
                    subscriber_info.source,
                    HIGH_WATER_MARK
                );
            }
        }

        for subscriber_id in &failed_subscribers {
            self.subscribers.remove(subscriber_id);
        }

        if !failed_subscribers.is_empty() {
            return Err(NotificationError::PublishFailed {
                event_type: event.kind_name().to_string(),
                failed_subscribers,
            });
        }

        Ok(())
    }
}
