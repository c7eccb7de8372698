//! # Message Log
//!
//! The ordered record of everything shown in the main panel. Append-only:
//! entries are never edited, removed, or reordered, so arrival order is
//! display order.

use chrono::{DateTime, Local};

use crate::core::control::ControlCard;

/// What produced a plain log line. Drives styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Connection lifecycle notices
    Status,
    /// Text we put on the wire
    Sent,
    /// Plain text from the server
    Received,
    /// Transport failures
    Error,
    /// Control messages whose payload did not parse
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody {
    Line { kind: LineKind, text: String },
    Card(ControlCard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub body: EntryBody,
}

impl LogEntry {
    pub fn line(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            body: EntryBody::Line {
                kind,
                text: text.into(),
            },
        }
    }

    pub fn card(card: ControlCard) -> Self {
        Self {
            at: Local::now(),
            body: EntryBody::Card(card),
        }
    }

    /// Text of a plain line, `None` for cards.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Line { text, .. } => Some(text),
            EntryBody::Card(_) => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }
}
