//! Public API for the notification system
//!
//! This module provides the complete public API for the notification system.
//! External modules should import from here rather than directly from internal modules.

use std::sync::{Arc, LazyLock};
use tokio::sync::Mutex;

// Core event types and enums
pub use crate::notifications::event::{
    Event, EventFilter, QueueEvent, QueueEventType, SystemEvent, SystemEventType,
};

// Manager and utilities
pub use crate::notifications::error::NotificationError;
pub use crate::notifications::manager::{AsyncNotificationManager, EventReceiver};

// Statistics
pub use crate::notifications::traits::SubscriberStatistics;

/// Shared handle to a notification manager
pub type SharedNotificationManager = Arc<Mutex<AsyncNotificationManager>>;

/// Global notification service instance
static NOTIFICATION_SERVICE: LazyLock<SharedNotificationManager> = LazyLock::new(|| {
    log::trace!("Initializing notification service");
    Arc::new(Mutex::new(AsyncNotificationManager::new()))
});

/// Access notification service
///
/// Returns a guard on the global notification service that can be used
/// to publish events and manage subscribers.
///
/// # Examples
/// ```no_run
/// # use clinic_queue::notifications::api::{get_notification_service, Event, SystemEvent, SystemEventType};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut manager = get_notification_service().await;
/// let event = Event::System(SystemEvent::new(SystemEventType::Startup));
/// manager.publish(event).await?;
/// # Ok(())
/// # }
/// ```
pub async fn get_notification_service() -> tokio::sync::MutexGuard<'static, AsyncNotificationManager>
{
    log::trace!("Acquiring notification service lock");
    NOTIFICATION_SERVICE.lock().await
}

/// Get a shared reference to the global notification service
///
/// Used to inject the global service into the queue service at startup.
pub fn get_notification_service_arc() -> SharedNotificationManager {
    NOTIFICATION_SERVICE.clone()
}

/// Create an independent notification manager, e.g. for tests or embedding
pub fn new_notification_manager() -> SharedNotificationManager {
    Arc::new(Mutex::new(AsyncNotificationManager::new()))
}
