//! The normalized message record and speaker roles.
//!
//! This module provides [`MessageRecord`], the structured representation of
//! one logical chat message, and [`Role`], the resolved authorship of a
//! record relative to the declared persona owner.
//!
//! # Overview
//!
//! A record consists of:
//! - **Required**: `speaker_name` and `content`
//! - **Optional**: `timestamp` (absent when a header's date/time could not be
//!   parsed) and `role` (absent until participant resolution runs)
//!
//! The ordering of records in a parsed sequence always equals their original
//! order in the source file. Timestamps are advisory metadata, never a sort
//! key — exports are already chronological and timestamps may be missing.
//!
//! # Examples
//!
//! ```
//! use talkpack::{MessageRecord, Role};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
//!     .unwrap()
//!     .and_hms_opt(9, 30, 0)
//!     .unwrap();
//!
//! let record = MessageRecord::new("홍길동", "점심 먹었어?")
//!     .with_timestamp(ts)
//!     .with_role(Role::Other);
//!
//! assert!(record.role().is_some_and(Role::is_counterparty));
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Resolved authorship of a message relative to the persona owner.
///
/// Serializes to `"self"`, `"other"`, or `{"participant": "<name>"}` so that
/// downstream style-learning collaborators can consume roles directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Authored by the persona owner.
    #[serde(rename = "self")]
    Me,
    /// Authored by the single counterparty of a 1:1 (or target-filtered)
    /// conversation.
    Other,
    /// Authored by a distinct counterparty in an unfiltered group chat,
    /// tagged with their display name. Group counterparties keep their
    /// identity because style learning and timing need to tell them apart.
    Participant(String),
}

impl Role {
    /// Returns `true` if the message was authored by the persona owner.
    pub fn is_self(&self) -> bool {
        matches!(self, Role::Me)
    }

    /// Returns `true` if the message was authored by any counterparty.
    pub fn is_counterparty(&self) -> bool {
        !self.is_self()
    }

    /// Returns the group counterparty name, if this role carries one.
    pub fn participant_name(&self) -> Option<&str> {
        match self {
            Role::Participant(name) => Some(name),
            _ => None,
        }
    }
}

/// One logical chat message recovered from an export file.
///
/// A record may span several source lines: continuation lines are folded
/// into `content`, joined with `\n`. Construction follows the builder
/// pattern:
///
/// ```
/// use talkpack::MessageRecord;
///
/// let record = MessageRecord::new("Alice", "first line\nsecond line");
/// assert!(record.timestamp().is_none());
/// assert_eq!(record.content().lines().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Display name exactly as it appeared in the export.
    pub speaker_name: String,

    /// Full message body. May contain newlines for multi-line messages.
    pub content: String,

    /// When the message was sent, as local wall-clock time.
    ///
    /// `None` when a header matched structurally but its date or time failed
    /// to parse — content survives even when the timestamp does not.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,

    /// Resolved authorship. `None` until participant resolution runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub role: Option<Role>,
}

impl MessageRecord {
    /// Creates a new record with only speaker and content.
    pub fn new(speaker_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker_name: speaker_name.into(),
            content: content.into(),
            timestamp: None,
            role: None,
        }
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, ts: NaiveDateTime) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Builder method to set the resolved role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Returns the speaker display name.
    pub fn speaker_name(&self) -> &str {
        &self.speaker_name
    }

    /// Returns the message content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the timestamp, if one was parsed.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    /// Returns the resolved role, if resolution has run.
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Returns `true` if this record's content is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Appends a continuation line to the message body.
    pub(crate) fn append_line(&mut self, line: &str) {
        self.content.push('\n');
        self.content.push_str(line);
    }
}
