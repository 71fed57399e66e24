//! Traits and records for entry storage backends

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::serving::api::{Entry, EntryId, EntryKind, EntryStatus};
use crate::store::error::StoreResult;

/// Fully validated entry ready to be stored
///
/// The backend assigns the id and sets the status to waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub contact: String,
    pub sequence_number: u64,
    pub kind: EntryKind,
    pub arrival_time: DateTime<Utc>,
    pub category: String,
}

/// Partial update of an entry; `None` fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<EntryStatus>,
    pub started_at: Option<DateTime<Utc>>,
    /// `Some(None)` clears the completion stamp
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl EntryPatch {
    pub fn status(status: EntryStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn with_completed_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Apply the patch to a stored entry
    pub fn apply_to(self, entry: &mut Entry) {
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(started_at) = self.started_at {
            entry.started_at = Some(started_at);
        }
        if let Some(completed_at) = self.completed_at {
            entry.completed_at = completed_at;
        }
    }
}

/// Storage backend for queue entries
///
/// Implementations only need to be individually consistent per call; the
/// queue service serialises every mutation itself.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Store a new waiting entry and return it with its assigned id
    async fn insert(&self, record: NewRecord) -> StoreResult<Entry>;

    async fn get(&self, id: EntryId) -> StoreResult<Option<Entry>>;

    /// Apply a patch, returning the updated entry or `None` if unknown
    async fn update(&self, id: EntryId, patch: EntryPatch) -> StoreResult<Option<Entry>>;

    /// Remove an entry, returning whether it existed
    async fn delete(&self, id: EntryId) -> StoreResult<bool>;

    /// Remove every entry, returning how many were removed
    async fn delete_all(&self) -> StoreResult<usize>;

    /// Waiting and in-progress entries ordered by arrival time
    async fn list_active(&self) -> StoreResult<Vec<Entry>>;

    /// Highest sequence number currently stored, 0 when empty
    async fn max_sequence_number(&self) -> StoreResult<u64>;
}
