//! Queue Composer
//!
//! Merges booked and walk-in arrivals into one serving order. Each kind keeps
//! its own arrival order; the merge takes a run of booked entries, then one
//! walk-in, and repeats. Once either side runs dry the other drains in order.

use crate::core::validation::ValidationError;
use crate::serving::entry::{Entry, EntryKind};

/// Interleaving rule for the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    booked_per_walk_in: usize,
}

impl SlotPolicy {
    pub const DEFAULT_BOOKED_PER_WALK_IN: usize = 3;

    /// Policy serving `booked_per_walk_in` booked entries before each walk-in
    pub fn new(booked_per_walk_in: usize) -> Result<Self, ValidationError> {
        if booked_per_walk_in == 0 {
            return Err(ValidationError::new(
                "'booked_per_walk_in' must be greater than 0",
            ));
        }
        Ok(Self { booked_per_walk_in })
    }

    pub fn booked_per_walk_in(&self) -> usize {
        self.booked_per_walk_in
    }
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            booked_per_walk_in: Self::DEFAULT_BOOKED_PER_WALK_IN,
        }
    }
}

/// Order active entries into a single serving sequence
///
/// Entries that are not active are dropped. The result depends only on the
/// set of entries passed in, not on their input order: within a kind the
/// order is (arrival time, sequence number), and sequence numbers are unique.
pub fn compose(entries: Vec<Entry>, policy: SlotPolicy) -> Vec<Entry> {
    let (mut booked, mut walk_ins): (Vec<Entry>, Vec<Entry>) = entries
        .into_iter()
        .filter(Entry::is_active)
        .partition(|entry| entry.kind == EntryKind::Booked);

    // Store enumerations are already arrival-ordered, so these are near-linear
    booked.sort_by_key(|entry| (entry.arrival_time, entry.sequence_number));
    walk_ins.sort_by_key(|entry| (entry.arrival_time, entry.sequence_number));

    let mut ordered = Vec::with_capacity(booked.len() + walk_ins.len());
    let mut booked = booked.into_iter();
    let mut walk_ins = walk_ins.into_iter();

    loop {
        let before = ordered.len();
        ordered.extend(booked.by_ref().take(policy.booked_per_walk_in));
        ordered.extend(walk_ins.next());
        if ordered.len() == before {
            break;
        }
    }

    log::trace!("Composed {} active entries", ordered.len());
    ordered
}
