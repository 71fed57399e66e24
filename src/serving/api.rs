//! Public API for the serving core
//!
//! External modules should import from here rather than directly from internal modules.

// Entry model
pub use crate::serving::entry::{Entry, EntryEdit, EntryId, EntryKind, EntryStatus, NewEntry};

// Pure ordering and annotation
pub use crate::serving::annotator::{
    annotate, validate_sequence, EntryView, DEFAULT_SERVICE_MINUTES, MAX_SERVICE_MINUTES,
};
pub use crate::serving::composer::{compose, SlotPolicy};
pub use crate::serving::snapshot::QueueSnapshot;
pub use crate::serving::tracking::{TrackingLinks, DEFAULT_TRACKING_BASE_URL};

// Serving controller
pub use crate::serving::service::{
    QueueService, QueueSettings, Registration, ServiceAdvance, TrackedEntry, DEFAULT_CATEGORY,
};

// Error handling
pub use crate::serving::error::{QueueError, QueueResult};
