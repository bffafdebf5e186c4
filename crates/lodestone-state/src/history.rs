//! Append-only transition history.
//!
//! While debug recording is on, every attempted transition, accepted or
//! rejected, lands here. Records are only ever appended; time travel
//! re-applies old states as new entries rather than truncating the log.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One attempted transition: what was dispatched, what it produced, and
/// whether the validator accepted it.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord<S> {
    /// When the transition was processed.
    pub timestamp: DateTime<Utc>,
    /// Rendering of the dispatched action.
    pub action: String,
    /// The state the reducer produced. Recorded even when rejected, so the
    /// log shows what a rejected action *would* have done.
    pub state: S,
    /// Whether the validator accepted the transition.
    pub accepted: bool,
}

impl<S> HistoryRecord<S> {
    pub(crate) fn new(action: impl Into<String>, state: S, accepted: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.into(),
            state,
            accepted,
        }
    }
}

/// Ordered log of attempted transitions.
///
/// Storage is a 0-based `Vec`; the public time-travel surface addresses
/// records with 1-based indices and [`HistoryLog::at`] is the one place
/// that converts.
#[derive(Debug)]
pub(crate) struct HistoryLog<S> {
    records: Vec<HistoryRecord<S>>,
}

impl<S> HistoryLog<S> {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, record: HistoryRecord<S>) {
        self.records.push(record);
    }

    pub(crate) fn records(&self) -> &[HistoryRecord<S>] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by 1-based index.
    pub(crate) fn at(&self, index: usize) -> Option<&HistoryRecord<S>> {
        index.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
