//! Entry storage
//!
//! The queue core talks to storage only through [`EntryStore`]. An in-memory
//! backend is provided; any other backend must honour the same contract:
//! ids assigned on insert, `list_active` ordered by arrival time, and
//! `max_sequence_number` reporting the highest number still stored.

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryEntryStore;
pub use traits::{EntryPatch, EntryStore, NewRecord};
