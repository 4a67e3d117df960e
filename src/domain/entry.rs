//! Daily task entry and its status state machine
//!
//! One `DailyTaskEntry` exists per calendar date. Status moves
//! `NotNow -> Incomplete` (maintenance sweep only) and
//! `NotNow | Incomplete -> Complete` (explicit completion, terminal).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resolution status of a daily task entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    /// Initial state when an entry is created for a date
    #[default]
    #[serde(rename = "Not Now")]
    NotNow,
    /// Set by the sweep when a day expired without completion
    #[serde(rename = "Incomplete")]
    Incomplete,
    /// Terminal state for the date
    #[serde(rename = "Complete")]
    Complete,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotNow => write!(f, "Not Now"),
            Self::Incomplete => write!(f, "Incomplete"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

/// The single record tracking which task was offered on a date and how it resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTaskEntry {
    /// Calendar date, unique key within the history
    pub date: NaiveDate,

    /// Raw task text selected from the weekly batch
    pub task: String,

    /// Current resolution status (legacy records omit it)
    #[serde(default)]
    pub status: TaskStatus,
}

impl DailyTaskEntry {
    /// Create a fresh entry for a date; new entries always start as NotNow
    pub fn new(date: NaiveDate, task: impl Into<String>) -> Self {
        Self {
            date,
            task: task.into(),
            status: TaskStatus::NotNow,
        }
    }

    /// Mark the entry Complete. Completing an already-Complete entry is a
    /// no-op; returns whether the status actually changed.
    pub fn complete(&mut self) -> bool {
        if self.status == TaskStatus::Complete {
            return false;
        }
        self.status = TaskStatus::Complete;
        true
    }

    /// Expire the entry (sweep transition). Only NotNow entries expire;
    /// returns whether the status actually changed.
    pub fn expire(&mut self) -> bool {
        if self.status != TaskStatus::NotNow {
            return false;
        }
        self.status = TaskStatus::Incomplete;
        true
    }
}

/// On-disk history shapes. Early versions of the history file held a single
/// bare record instead of an array; both forms are accepted on read and
/// resolved here, once, into the canonical sequence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HistoryFile {
    Entries(Vec<DailyTaskEntry>),
    Legacy(DailyTaskEntry),
}

impl HistoryFile {
    /// Normalize into the canonical sequence form
    pub fn into_entries(self) -> Vec<DailyTaskEntry> {
        match self {
            Self::Entries(entries) => entries,
            Self::Legacy(entry) => vec![entry],
        }
    }
}
