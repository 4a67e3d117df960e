//! Core domain types: daily entries, user profiles, task templates

mod entry;
mod profile;

pub use entry::{DailyTaskEntry, HistoryFile, TaskStatus};
pub use profile::{ActivityHistoryEntry, JsonProfileStore, ProfileStore, TaskTemplate, UserProfile};
