//! Composed and annotated view of the queue at one point in time

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::serving::annotator::EntryView;
use crate::serving::entry::{Entry, EntryId};

/// Queue state published to observers after every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    /// Number of mutations published so far
    pub revision: u64,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<EntryView>,
}

impl QueueSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry currently being served
    pub fn current(&self) -> Option<&Entry> {
        self.entries
            .iter()
            .map(|view| &view.entry)
            .find(|entry| entry.is_in_progress())
    }

    pub fn view_of(&self, id: EntryId) -> Option<&EntryView> {
        self.entries.iter().find(|view| view.entry.id == id)
    }

    /// Sequence numbers in serving order
    pub fn sequence_numbers(&self) -> Vec<u64> {
        self.entries
            .iter()
            .map(|view| view.entry.sequence_number)
            .collect()
    }
}
