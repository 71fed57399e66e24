//! Entry types shared by the composer, annotator, service and stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::validation::ValidationError;

/// Store-assigned identifier of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(EntryId)
            .map_err(|_| ValidationError::new(format!("'{s}' is not a valid entry id")))
    }
}

/// How the client arrived
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum EntryKind {
    #[strum(to_string = "booked", serialize = "appointment")]
    Booked,
    #[default]
    #[strum(to_string = "walk-in", serialize = "walkin", serialize = "walk_in")]
    WalkIn,
}

/// Serving status of an entry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum EntryStatus {
    #[default]
    #[strum(to_string = "waiting")]
    Waiting,
    #[strum(to_string = "in-progress", serialize = "in_progress", serialize = "serving")]
    InProgress,
    #[strum(to_string = "done", serialize = "completed")]
    Done,
}

impl EntryStatus {
    /// Waiting and in-progress entries take part in the queue
    pub fn is_active(self) -> bool {
        matches!(self, EntryStatus::Waiting | EntryStatus::InProgress)
    }
}

/// One client in the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub contact: String,
    pub sequence_number: u64,
    pub kind: EntryKind,
    pub status: EntryStatus,
    pub arrival_time: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub category: String,
}

impl Entry {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == EntryStatus::InProgress
    }
}

/// Registration request as received from the front desk
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewEntry {
    pub name: String,
    pub contact: String,
    /// Defaults to walk-in
    pub kind: Option<EntryKind>,
    pub category: Option<String>,
}

impl NewEntry {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            kind: None,
            category: None,
        }
    }

    pub fn booked(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self::new(name, contact).with_kind(EntryKind::Booked)
    }

    pub fn walk_in(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self::new(name, contact).with_kind(EntryKind::WalkIn)
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Administrative edit of an existing entry
///
/// Contact and kind are fixed at registration and cannot be edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub status: Option<EntryStatus>,
}

impl EntryEdit {
    pub fn status(status: EntryStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.status.is_none()
    }
}
