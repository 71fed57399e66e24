//! Queue ordering and serving
//!
//! Booked and walk-in clients share one serving order. The pieces, leaves
//! first:
//!
//! - [`compose`](api::compose) merges active entries with a 3:1
//!   booked/walk-in slotting policy
//! - [`annotate`](api::annotate) attaches positions and wait estimates
//! - [`QueueService`](api::QueueService) serialises every mutation,
//!   moves one entry at a time through waiting, in progress and done, and
//!   publishes the resulting queue after each change
//!
//! ```text
//! register / edit / delete / reset / advance
//!        │
//!        ▼
//! ┌───────────────┐  list_active  ┌────────────┐
//! │ QueueService  │──────────────▶│ EntryStore │
//! │ (one writer)  │◀──────────────│            │
//! └──────┬────────┘               └────────────┘
//!        │ compose → annotate
//!        ▼
//! ┌──────────────────────────┐
//! │ AsyncNotificationManager │──▶ observers (console, lobby screen, ...)
//! └──────────────────────────┘
//! ```

pub(crate) mod annotator;
pub(crate) mod composer;
pub(crate) mod entry;
pub(crate) mod error;
pub(crate) mod service;
pub(crate) mod snapshot;
pub(crate) mod tracking;

// Public API module - the only public interface for the serving core
pub mod api;

#[cfg(test)]
mod tests;
