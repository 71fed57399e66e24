//! Clinic service queue
//!
//! Booked and walk-in clients are merged into one serving order, annotated
//! with estimated waits and advanced one client at a time. Every change is
//! published to observers as a fresh queue snapshot.

pub mod app;
pub mod core;
pub mod messaging;
pub mod notifications;
pub mod serving;
pub mod store;
