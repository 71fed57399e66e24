//! Event types for the notification system

use std::sync::Arc;
use std::time::SystemTime;

use crate::serving::api::QueueSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueueEventType {
    EntryRegistered,
    EntryUpdated,
    EntryDeleted,
    ServiceAdvanced,
    QueueReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemEventType {
    Startup,
    Shutdown,
}

/// A new composed and annotated queue, published after a mutation
#[derive(Clone, Debug)]
pub struct QueueEvent {
    pub event_type: QueueEventType,
    pub timestamp: SystemTime,
    pub snapshot: Arc<QueueSnapshot>,
}

impl QueueEvent {
    pub fn new(event_type: QueueEventType, snapshot: Arc<QueueSnapshot>) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            snapshot,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SystemEvent {
    pub event_type: SystemEventType,
    pub timestamp: SystemTime,
    pub message: Option<String>,
}

impl SystemEvent {
    pub fn new(event_type: SystemEventType) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            message: None,
        }
    }

    pub fn with_message(event_type: SystemEventType, message: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            message: Some(message),
        }
    }
}

/// Unified event enum that encompasses all event types
#[derive(Clone, Debug)]
pub enum Event {
    Queue(QueueEvent),
    System(SystemEvent),
}

impl Event {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Event::Queue(_) => "Queue",
            Event::System(_) => "System",
        }
    }
}

/// Event filtering options for subscribers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventFilter {
    All,
    QueueOnly,
    SystemOnly,
}

impl EventFilter {
    pub fn accepts(&self, event: &Event) -> bool {
        matches!(
            (self, event),
            (EventFilter::All, _)
                | (EventFilter::QueueOnly, Event::Queue(_))
                | (EventFilter::SystemOnly, Event::System(_))
        )
    }
}
