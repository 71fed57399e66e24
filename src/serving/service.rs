//! QueueService - serialized mutations over the entry store
//!
//! Every mutating operation runs inside one writer critical section:
//! read the active set, decide, write, then publish the resulting queue.
//! The published queue is derived from the active set read at the start of
//! the section plus the writes made inside it, so no second read can observe
//! a half-applied mutation and a failed write never publishes anything.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::time::{Clock, SystemClock};
use crate::core::validation::{validate_category, validate_contact, validate_name};
use crate::messaging::{NoopSender, NotificationSender};
use crate::notifications::api::{
    Event, QueueEvent, QueueEventType, SharedNotificationManager,
};
use crate::serving::annotator::{annotate, validate_sequence, EntryView, DEFAULT_SERVICE_MINUTES};
use crate::serving::composer::{compose, SlotPolicy};
use crate::serving::entry::{Entry, EntryEdit, EntryId, EntryStatus, NewEntry};
use crate::serving::error::{QueueError, QueueResult};
use crate::serving::snapshot::QueueSnapshot;
use crate::serving::tracking::TrackingLinks;
use crate::store::{EntryPatch, EntryStore, NewRecord};

/// Category given to entries registered without one
pub const DEFAULT_CATEGORY: &str = "general";

/// Tunables of the queue service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    pub slot_policy: SlotPolicy,
    pub service_minutes: u64,
    pub default_category: String,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            slot_policy: SlotPolicy::default(),
            service_minutes: DEFAULT_SERVICE_MINUTES,
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

/// Result of a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub entry: Entry,
    pub tracking_reference: String,
    pub position: usize,
    pub estimated_wait_minutes: u64,
    /// Whether the client notification was delivered
    pub notified: bool,
}

/// An entry with its tracking reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEntry {
    pub entry: Entry,
    pub tracking_reference: String,
}

/// Result of advancing the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAdvance {
    /// Entry that was in progress and is now done
    pub completed: Option<Entry>,
    /// Entry that is now in progress
    pub started: Option<Entry>,
    pub snapshot: Arc<QueueSnapshot>,
}

/// State owned by the single writer
#[derive(Debug, Default)]
struct WriterState {
    /// Highest sequence number ever issued by this service
    last_sequence: u64,
}

/// The queue-ordering and serving state machine
pub struct QueueService {
    store: Arc<dyn EntryStore>,
    broadcaster: SharedNotificationManager,
    sender: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    tracking: TrackingLinks,
    settings: QueueSettings,
    writer: Mutex<WriterState>,
    revision: AtomicU64,
}

impl QueueService {
    /// Create a service with default settings, system clock and no messaging
    pub fn new(store: Arc<dyn EntryStore>, broadcaster: SharedNotificationManager) -> Self {
        Self {
            store,
            broadcaster,
            sender: Arc::new(NoopSender),
            clock: Arc::new(SystemClock),
            tracking: TrackingLinks::default(),
            settings: QueueSettings::default(),
            writer: Mutex::new(WriterState::default()),
            revision: AtomicU64::new(0),
        }
    }

    pub fn with_sender(mut self, sender: Arc<dyn NotificationSender>) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingLinks) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn with_settings(mut self, settings: QueueSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    pub fn tracking(&self) -> &TrackingLinks {
        &self.tracking
    }

    /// Register a new client and notify them
    pub async fn register(&self, new_entry: NewEntry) -> QueueResult<Registration> {
        let name = validate_name(&new_entry.name)?;
        let contact = validate_contact(&new_entry.contact)?;
        let category =
            validate_category(new_entry.category.as_deref(), &self.settings.default_category)?;
        let kind = new_entry.kind.unwrap_or_default();

        let (entry, view) = {
            let mut state = self.writer.lock().await;
            let mut active = self.read_active().await?;

            let stored_max = self.store.max_sequence_number().await?;
            let sequence_number = stored_max.max(state.last_sequence) + 1;

            let entry = self
                .store
                .insert(NewRecord {
                    name,
                    contact,
                    sequence_number,
                    kind,
                    arrival_time: self.clock.now(),
                    category,
                })
                .await?;
            state.last_sequence = sequence_number;
            log::info!(
                "Registered {} entry {} (#{}) '{}' [{}]",
                entry.kind,
                entry.id,
                entry.sequence_number,
                entry.name,
                entry.category
            );

            active.push(entry.clone());
            let snapshot = self
                .publish(QueueEventType::EntryRegistered, active)
                .await?;
            let view = snapshot.view_of(entry.id).cloned();
            (entry, view)
        };

        let notified = self.notify(&entry).await;
        let (position, estimated_wait_minutes) = view
            .map(|v| (v.position, v.estimated_wait_minutes))
            .unwrap_or_default();

        Ok(Registration {
            tracking_reference: self.tracking.reference(entry.sequence_number),
            entry,
            position,
            estimated_wait_minutes,
            notified,
        })
    }

    /// Look up an entry by id
    pub async fn get_entry(&self, id: EntryId) -> QueueResult<TrackedEntry> {
        let entry = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| QueueError::not_found(id))?;
        Ok(TrackedEntry {
            tracking_reference: self.tracking.reference(entry.sequence_number),
            entry,
        })
    }

    /// Apply an administrative edit
    ///
    /// Status changes are not checked against the normal serving order, but
    /// an entry cannot be set in progress while a different one is.
    pub async fn edit_entry(&self, id: EntryId, edit: EntryEdit) -> QueueResult<Entry> {
        if edit.is_empty() {
            return Err(QueueError::validation("Nothing to edit"));
        }
        let name = edit.name.as_deref().map(validate_name).transpose()?;
        let category = match edit.category.as_deref() {
            Some(category) => Some(validate_category(
                Some(category),
                &self.settings.default_category,
            )?),
            None => None,
        };

        let _state = self.writer.lock().await;
        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| QueueError::not_found(id))?;
        let active = self.read_active().await?;

        if edit.status == Some(EntryStatus::InProgress) {
            if let Some(other) = active.iter().find(|e| e.is_in_progress() && e.id != id) {
                return Err(QueueError::validation(format!(
                    "Entry #{} is already in progress; advance the queue instead",
                    other.sequence_number
                )));
            }
        }

        let patch = EntryPatch {
            name,
            category,
            status: edit.status,
            ..EntryPatch::default()
        };
        let updated = self
            .store
            .update(id, patch)
            .await?
            .ok_or_else(|| QueueError::not_found(id))?;

        if current.status != updated.status {
            log::info!(
                "Status of entry {} (#{}) set to {} (was {})",
                id,
                updated.sequence_number,
                updated.status,
                current.status
            );
        } else {
            log::info!("Edited entry {} (#{})", id, updated.sequence_number);
        }

        let mut after: Vec<Entry> = active.into_iter().filter(|e| e.id != id).collect();
        if updated.is_active() {
            after.push(updated.clone());
        }
        self.publish(QueueEventType::EntryUpdated, after).await?;

        Ok(updated)
    }

    /// Remove an entry entirely
    pub async fn delete_entry(&self, id: EntryId) -> QueueResult<()> {
        let _state = self.writer.lock().await;
        let active = self.read_active().await?;

        if !self.store.delete(id).await? {
            return Err(QueueError::not_found(id));
        }
        log::info!("Deleted entry {}", id);

        let after = active.into_iter().filter(|e| e.id != id).collect();
        self.publish(QueueEventType::EntryDeleted, after).await?;
        Ok(())
    }

    /// Remove every entry; sequence numbering continues where it left off
    pub async fn reset(&self) -> QueueResult<usize> {
        let mut state = self.writer.lock().await;

        let stored_max = self.store.max_sequence_number().await?;
        let removed = self.store.delete_all().await?;
        state.last_sequence = state.last_sequence.max(stored_max);
        log::info!(
            "Queue reset, {} entries removed; next sequence number is {}",
            removed,
            state.last_sequence + 1
        );

        self.publish(QueueEventType::QueueReset, Vec::new()).await?;
        Ok(removed)
    }

    /// Finish the current client and start serving the next one
    pub async fn advance_service(&self) -> QueueResult<ServiceAdvance> {
        let _state = self.writer.lock().await;
        let active = self.read_active().await?;
        let now = self.clock.now();

        let (previous, waiting): (Vec<Entry>, Vec<Entry>) =
            active.into_iter().partition(Entry::is_in_progress);

        let completed = match previous.into_iter().next() {
            Some(previous) => {
                let patch = EntryPatch::status(EntryStatus::Done)
                    .with_completed_at(previous.completed_at.or(Some(now)));
                let done = self
                    .store
                    .update(previous.id, patch)
                    .await?
                    .ok_or_else(|| QueueError::not_found(previous.id))?;
                Some((previous, done))
            }
            None => None,
        };

        let mut ordered = compose(waiting, self.settings.slot_policy);
        let started = match ordered.first_mut() {
            Some(head) => {
                let mut patch = EntryPatch::status(EntryStatus::InProgress);
                if head.started_at.is_none() {
                    patch = patch.with_started_at(now);
                }
                match self.store.update(head.id, patch).await {
                    Ok(Some(started)) => {
                        *head = started.clone();
                        Some(started)
                    }
                    Ok(None) => {
                        let error = QueueError::not_found(head.id);
                        self.restore_in_progress(completed.as_ref().map(|(p, _)| p))
                            .await;
                        return Err(error);
                    }
                    Err(error) => {
                        self.restore_in_progress(completed.as_ref().map(|(p, _)| p))
                            .await;
                        return Err(error.into());
                    }
                }
            }
            None => None,
        };

        let completed = completed.map(|(_, done)| done);
        match (&completed, &started) {
            (Some(done), Some(next)) => log::info!(
                "Completed #{}; now serving #{} '{}'",
                done.sequence_number,
                next.sequence_number,
                next.name
            ),
            (Some(done), None) => {
                log::info!("Completed #{}; queue is empty", done.sequence_number)
            }
            (None, Some(next)) => {
                log::info!("Now serving #{} '{}'", next.sequence_number, next.name)
            }
            (None, None) => log::info!("Advance requested on an empty queue"),
        }

        let snapshot = self
            .publish(QueueEventType::ServiceAdvanced, ordered)
            .await?;

        Ok(ServiceAdvance {
            completed,
            started,
            snapshot,
        })
    }

    /// Current composed and annotated queue, without publishing
    ///
    /// Reads under the writer lock so the revision matches the contents.
    pub async fn snapshot(&self) -> QueueResult<QueueSnapshot> {
        let _state = self.writer.lock().await;
        let active = self.read_active().await?;
        self.project(active, self.revision.load(Ordering::SeqCst))
    }

    /// The entry currently being served
    pub async fn current(&self) -> QueueResult<Option<Entry>> {
        let active = self.read_active().await?;
        Ok(active.into_iter().find(Entry::is_in_progress))
    }

    async fn read_active(&self) -> QueueResult<Vec<Entry>> {
        let active = self.store.list_active().await?;
        validate_sequence(&active)?;
        Ok(active)
    }

    fn project(&self, active: Vec<Entry>, revision: u64) -> QueueResult<QueueSnapshot> {
        let ordered = compose(active, self.settings.slot_policy);
        let entries: Vec<EntryView> = annotate(ordered, self.settings.service_minutes)?;
        Ok(QueueSnapshot {
            revision,
            generated_at: self.clock.now(),
            entries,
        })
    }

    /// Compose the post-mutation queue and push it to observers
    ///
    /// Delivery problems are logged; they never fail the mutation.
    async fn publish(
        &self,
        event_type: QueueEventType,
        active: Vec<Entry>,
    ) -> QueueResult<Arc<QueueSnapshot>> {
        let revision = self.revision.load(Ordering::SeqCst) + 1;
        let snapshot = Arc::new(self.project(active, revision)?);
        self.revision.store(revision, Ordering::SeqCst);

        let event = Event::Queue(QueueEvent::new(event_type, Arc::clone(&snapshot)));
        if let Err(e) = self.broadcaster.lock().await.publish(event).await {
            log::warn!("Queue update r{} not delivered to every observer: {}", revision, e);
        }
        log::debug!(
            "Published queue r{} ({:?}, {} active)",
            revision,
            event_type,
            snapshot.len()
        );

        Ok(snapshot)
    }

    async fn restore_in_progress(&self, previous: Option<&Entry>) {
        let Some(previous) = previous else {
            return;
        };

        let patch = EntryPatch::status(EntryStatus::InProgress)
            .with_completed_at(previous.completed_at);
        match self.store.update(previous.id, patch).await {
            Ok(Some(_)) => log::warn!(
                "Advance aborted; entry #{} restored to in progress",
                previous.sequence_number
            ),
            Ok(None) => log::error!(
                "Advance aborted and entry #{} vanished before it could be restored",
                previous.sequence_number
            ),
            Err(e) => log::error!(
                "Advance aborted and entry #{} could not be restored: {}",
                previous.sequence_number,
                e
            ),
        }
    }

    async fn notify(&self, entry: &Entry) -> bool {
        match self
            .sender
            .send(&entry.contact, entry.sequence_number, &entry.name)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "Could not notify entry #{} via {}: {}",
                    entry.sequence_number,
                    self.sender.channel_name(),
                    e
                );
                false
            }
        }
    }
}
