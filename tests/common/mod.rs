//! Common test utilities and helpers
//!
//! Queue service fixtures and a fake SMS gateway shared by the integration
//! tests.

#![allow(dead_code)]

pub mod gateway;

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use clinic_queue::core::time::ManualClock;
use clinic_queue::notifications::api::{
    new_notification_manager, Event, EventFilter, EventReceiver, SharedNotificationManager,
};
use clinic_queue::serving::api::{QueueService, QueueSnapshot};
use clinic_queue::store::MemoryEntryStore;

/// A queue service on a frozen clock with one subscribed observer
pub struct Fixture {
    pub service: Arc<QueueService>,
    pub store: Arc<MemoryEntryStore>,
    pub clock: ManualClock,
    pub broadcaster: SharedNotificationManager,
    pub events: EventReceiver,
}

pub async fn fixture() -> Fixture {
    let store = Arc::new(MemoryEntryStore::new());
    let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap());
    let broadcaster = new_notification_manager();
    let events = broadcaster.lock().await.subscribe(
        "integration-observer".to_string(),
        EventFilter::QueueOnly,
        "tests".to_string(),
    );
    let service = QueueService::new(store.clone(), Arc::clone(&broadcaster))
        .with_clock(Arc::new(clock.clone()));

    Fixture {
        service: Arc::new(service),
        store,
        clock,
        broadcaster,
        events,
    }
}

/// Snapshots delivered to the observer so far
pub fn drain_snapshots(events: &mut EventReceiver) -> Vec<Arc<QueueSnapshot>> {
    let mut snapshots = Vec::new();
    while let Some(event) = events.try_recv() {
        if let Event::Queue(queue_event) = event {
            snapshots.push(queue_event.snapshot);
        }
    }
    snapshots
}
