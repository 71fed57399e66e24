//! Shared fixtures for serving tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::time::ManualClock;
use crate::messaging::{MessagingError, MessagingResult, NotificationSender};
use crate::notifications::api::{
    new_notification_manager, Event, EventFilter, EventReceiver, QueueEventType,
};
use crate::serving::api::{
    Entry, EntryId, EntryStatus, NewEntry, QueueService, QueueSnapshot, Registration,
};
use crate::store::{EntryPatch, EntryStore, MemoryEntryStore, NewRecord, StoreError, StoreResult};

/// Records every notification instead of sending it
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, u64, String)>>,
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, contact: &str, sequence_number: u64, name: &str) -> MessagingResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((contact.to_string(), sequence_number, name.to_string()));
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}

/// Sender whose gateway is always down
pub struct FailingSender;

#[async_trait]
impl NotificationSender for FailingSender {
    async fn send(&self, _contact: &str, _sequence_number: u64, _name: &str) -> MessagingResult<()> {
        Err(MessagingError::Transport {
            message: "gateway unreachable".to_string(),
        })
    }

    fn channel_name(&self) -> &str {
        "failing"
    }
}

/// Memory store with switchable failures
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryEntryStore,
    pub fail_reads: AtomicBool,
    pub fail_inserts: AtomicBool,
    pub fail_deletes: AtomicBool,
    /// Fail updates that would move an entry into progress
    pub fail_starts: AtomicBool,
}

impl FlakyStore {
    fn check(flag: &AtomicBool, operation: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::unavailable(format!("{operation} timed out")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntryStore for FlakyStore {
    async fn insert(&self, record: NewRecord) -> StoreResult<Entry> {
        Self::check(&self.fail_inserts, "insert")?;
        self.inner.insert(record).await
    }

    async fn get(&self, id: EntryId) -> StoreResult<Option<Entry>> {
        Self::check(&self.fail_reads, "get")?;
        self.inner.get(id).await
    }

    async fn update(&self, id: EntryId, patch: EntryPatch) -> StoreResult<Option<Entry>> {
        if patch.status == Some(EntryStatus::InProgress) && patch.started_at.is_some() {
            Self::check(&self.fail_starts, "update")?;
        }
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: EntryId) -> StoreResult<bool> {
        Self::check(&self.fail_deletes, "delete")?;
        self.inner.delete(id).await
    }

    async fn delete_all(&self) -> StoreResult<usize> {
        Self::check(&self.fail_deletes, "delete_all")?;
        self.inner.delete_all().await
    }

    async fn list_active(&self) -> StoreResult<Vec<Entry>> {
        Self::check(&self.fail_reads, "list_active")?;
        self.inner.list_active().await
    }

    async fn max_sequence_number(&self) -> StoreResult<u64> {
        Self::check(&self.fail_reads, "max_sequence_number")?;
        self.inner.max_sequence_number().await
    }
}

/// Queue service wired to test collaborators and an observer
pub struct Harness {
    pub service: Arc<QueueService>,
    pub store: Arc<FlakyStore>,
    pub sender: Arc<RecordingSender>,
    pub clock: ManualClock,
    pub observer: EventReceiver,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_sender_override(None).await
    }

    pub async fn with_failing_sender() -> Self {
        Self::with_sender_override(Some(Arc::new(FailingSender))).await
    }

    async fn with_sender_override(sender_override: Option<Arc<dyn NotificationSender>>) -> Self {
        let store = Arc::new(FlakyStore::default());
        let sender = Arc::new(RecordingSender::default());
        let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap());
        let broadcaster = new_notification_manager();
        let observer = broadcaster.lock().await.subscribe(
            "test-observer".to_string(),
            EventFilter::QueueOnly,
            "test:serving".to_string(),
        );

        let active_sender: Arc<dyn NotificationSender> = match sender_override {
            Some(other) => other,
            None => sender.clone(),
        };
        let service = QueueService::new(store.clone(), broadcaster)
            .with_sender(active_sender)
            .with_clock(Arc::new(clock.clone()));

        Self {
            service: Arc::new(service),
            store,
            sender,
            clock,
            observer,
        }
    }

    pub async fn booked(&self, name: &str) -> Registration {
        self.service
            .register(NewEntry::booked(name, "5550100"))
            .await
            .expect("booked registration should succeed")
    }

    pub async fn walk_in(&self, name: &str) -> Registration {
        self.service
            .register(NewEntry::walk_in(name, "5550199"))
            .await
            .expect("walk-in registration should succeed")
    }

    /// Every queue event delivered so far
    pub fn published(&mut self) -> Vec<(QueueEventType, Arc<QueueSnapshot>)> {
        let mut events = Vec::new();
        while let Some(event) = self.observer.try_recv() {
            if let Event::Queue(queue_event) = event {
                events.push((queue_event.event_type, queue_event.snapshot));
            }
        }
        events
    }

    pub async fn all_entries(&self) -> Vec<Entry> {
        self.store.inner.list_all().expect("memory store readable")
    }
}

/// Names in serving order
pub fn names(snapshot: &QueueSnapshot) -> Vec<&str> {
    snapshot
        .entries
        .iter()
        .map(|view| view.entry.name.as_str())
        .collect()
}
