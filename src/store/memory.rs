//! In-memory entry store

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::core::sync::{handle_rwlock_read, handle_rwlock_write};
use crate::serving::api::{Entry, EntryId, EntryStatus};
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::{EntryPatch, EntryStore, NewRecord};

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<EntryId, Entry>,
    last_id: u64,
}

/// Entry store keeping all records in process memory
///
/// Ids are never reused, even after `delete_all`.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    state: RwLock<MemoryState>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including completed ones
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.entries.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every stored entry in id order, including completed ones
    pub fn list_all(&self) -> StoreResult<Vec<Entry>> {
        Ok(self.read()?.entries.values().cloned().collect())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, MemoryState>> {
        handle_rwlock_read(self.state.read(), StoreError::unavailable)
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        handle_rwlock_write(self.state.write(), StoreError::unavailable)
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn insert(&self, record: NewRecord) -> StoreResult<Entry> {
        let mut state = self.write()?;
        state.last_id += 1;
        let id = EntryId::new(state.last_id);

        let entry = Entry {
            id,
            name: record.name,
            contact: record.contact,
            sequence_number: record.sequence_number,
            kind: record.kind,
            status: EntryStatus::Waiting,
            arrival_time: record.arrival_time,
            started_at: None,
            completed_at: None,
            category: record.category,
        };
        state.entries.insert(id, entry.clone());
        log::trace!("Stored entry {} (#{})", id, entry.sequence_number);
        Ok(entry)
    }

    async fn get(&self, id: EntryId) -> StoreResult<Option<Entry>> {
        Ok(self.read()?.entries.get(&id).cloned())
    }

    async fn update(&self, id: EntryId, patch: EntryPatch) -> StoreResult<Option<Entry>> {
        let mut state = self.write()?;
        Ok(state.entries.get_mut(&id).map(|entry| {
            patch.apply_to(entry);
            entry.clone()
        }))
    }

    async fn delete(&self, id: EntryId) -> StoreResult<bool> {
        Ok(self.write()?.entries.remove(&id).is_some())
    }

    async fn delete_all(&self) -> StoreResult<usize> {
        let mut state = self.write()?;
        let removed = state.entries.len();
        state.entries.clear();
        Ok(removed)
    }

    async fn list_active(&self) -> StoreResult<Vec<Entry>> {
        let state = self.read()?;
        let mut active: Vec<Entry> = state
            .entries
            .values()
            .filter(|entry| entry.is_active())
            .cloned()
            .collect();
        active.sort_by_key(|entry| (entry.arrival_time, entry.sequence_number));
        Ok(active)
    }

    async fn max_sequence_number(&self) -> StoreResult<u64> {
        Ok(self
            .read()?
            .entries
            .values()
            .map(|entry| entry.sequence_number)
            .max()
            .unwrap_or(0))
    }
}
