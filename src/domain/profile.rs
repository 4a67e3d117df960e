//! User profile data and the read-only profile store
//!
//! The account layer owns the users file; this core only ever reads it.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;

/// A task template owned by a user profile; immutable input to planning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub title: String,

    pub area: String,

    #[serde(default)]
    pub description: String,

    /// Ordered names of the fields a concrete task derived from this
    /// template is expected to carry
    #[serde(default)]
    pub fields: Vec<String>,
}

/// One append-only activity log record. Only the count matters to planning;
/// the values are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityHistoryEntry {
    pub timestamp: String,

    #[serde(default)]
    pub values: Vec<String>,
}

/// Everything planning needs to know about a user
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub username: String,

    pub join_date: String,

    #[serde(default)]
    pub task_templates: Vec<TaskTemplate>,

    #[serde(default)]
    pub activity_history: Vec<ActivityHistoryEntry>,
}

/// Read-only access to user profiles
pub trait ProfileStore: Send + Sync {
    /// Load the profile for a username; unknown users are a NotFound failure
    fn read_profile(&self, username: &str) -> Result<UserProfile, EngineError>;
}

/// Profile store backed by the account layer's JSON users file
pub struct JsonProfileStore {
    users_path: PathBuf,
}

#[derive(Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[derive(Deserialize)]
struct UserRecord {
    username: String,
    profile: ProfileBody,
}

#[derive(Deserialize)]
struct ProfileBody {
    join_date: String,
    #[serde(default)]
    task_templates: Vec<TaskTemplate>,
    #[serde(default)]
    activity_history: Vec<ActivityHistoryEntry>,
}

impl JsonProfileStore {
    pub fn new(users_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
        }
    }
}

impl ProfileStore for JsonProfileStore {
    fn read_profile(&self, username: &str) -> Result<UserProfile, EngineError> {
        debug!(%username, path = ?self.users_path, "read_profile: called");

        if !self.users_path.exists() {
            return Err(EngineError::not_found("users file"));
        }

        let content =
            fs::read_to_string(&self.users_path).map_err(|e| EngineError::persistence(&self.users_path, e))?;
        let file: UsersFile =
            serde_json::from_str(&content).map_err(|e| EngineError::persistence(&self.users_path, e))?;

        let record = file
            .users
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| EngineError::not_found(format!("user '{}'", username)))?;

        debug!(
            templates = record.profile.task_templates.len(),
            activity = record.profile.activity_history.len(),
            "read_profile: profile loaded"
        );

        Ok(UserProfile {
            username: record.username,
            join_date: record.profile.join_date,
            task_templates: record.profile.task_templates,
            activity_history: record.profile.activity_history,
        })
    }
}
