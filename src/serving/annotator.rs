//! Wait-Time Annotator
//!
//! Attaches a position and estimated wait to each entry of a composed queue.
//! Positions are indices into the composed sequence; the in-progress entry is
//! pinned to position 0 and the others keep their index unchanged.

use serde::Serialize;
use std::collections::HashSet;

use crate::core::validation::ValidationError;
use crate::serving::entry::Entry;

/// Assumed minutes spent serving one client
pub const DEFAULT_SERVICE_MINUTES: u64 = 15;

/// Longest configurable service time, one day
pub const MAX_SERVICE_MINUTES: u64 = 24 * 60;

/// An entry together with its derived queue metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub position: usize,
    pub estimated_wait_minutes: u64,
}

/// Check that a sequence can be annotated
///
/// Rejects repeated entry ids and more than one in-progress entry.
pub fn validate_sequence(entries: &[Entry]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut in_progress = None;

    for entry in entries {
        if !seen.insert(entry.id) {
            return Err(ValidationError::new(format!(
                "entry {} appears more than once in the queue",
                entry.id
            )));
        }
        if entry.is_in_progress() {
            if let Some(first) = in_progress.replace(entry.sequence_number) {
                return Err(ValidationError::new(format!(
                    "entries #{first} and #{} are both in progress",
                    entry.sequence_number
                )));
            }
        }
    }

    Ok(())
}

/// Annotate a composed sequence without reordering it
pub fn annotate(
    ordered: Vec<Entry>,
    minutes_per_entry: u64,
) -> Result<Vec<EntryView>, ValidationError> {
    validate_sequence(&ordered)?;

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let position = if entry.is_in_progress() { 0 } else { index };
            EntryView {
                estimated_wait_minutes: (position as u64).saturating_mul(minutes_per_entry),
                position,
                entry,
            }
        })
        .collect())
}
