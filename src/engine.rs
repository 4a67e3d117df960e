//! Task engine facade
//!
//! The boundary the transport layer talks to: weekly plan generation,
//! today's task resolution, completion, and the history listing. Owns the
//! process state (current quote) and all collaborator handles; nothing in
//! here is a global.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::domain::{DailyTaskEntry, ProfileStore, TaskStatus};
use crate::error::EngineError;
use crate::generator::TextGenerator;
use crate::maintenance::pick_quote;
use crate::planner::{TaskRecord, build_plan_request, split_task_blocks, weekly_capacity};
use crate::random::Chooser;
use crate::store::DailyTaskStore;

/// Characters of raw plan text included in the boundary preview
const PREVIEW_CHARS: usize = 240;

/// Result of a weekly planning cycle. `task_count` is how many task
/// records actually parsed out of the response; the generator may return
/// fewer or more than `weekly_capacity` and the batch is kept either way.
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub weekly_capacity: u32,
    pub task_count: usize,
    pub preview: String,
}

/// Boundary result for today's task; both fields are None when no batch
/// is available ("no tasks available" sentinel, no entry created)
#[derive(Debug, Serialize)]
pub struct TodayTask {
    pub date: NaiveDate,
    pub task: Option<String>,
    pub status: Option<TaskStatus>,
}

/// The adaptive daily task engine
pub struct TaskEngine {
    store: Arc<DailyTaskStore>,
    profiles: Arc<dyn ProfileStore>,
    generator: Arc<dyn TextGenerator>,
    clock: Arc<dyn Clock>,
    chooser: Arc<dyn Chooser>,
    max_weekly: u32,
    quote: Arc<RwLock<&'static str>>,
}

impl TaskEngine {
    pub fn new(
        store: Arc<DailyTaskStore>,
        profiles: Arc<dyn ProfileStore>,
        generator: Arc<dyn TextGenerator>,
        clock: Arc<dyn Clock>,
        chooser: Arc<dyn Chooser>,
        max_weekly: u32,
    ) -> Self {
        let initial_quote = pick_quote(chooser.as_ref());
        Self {
            store,
            profiles,
            generator,
            clock,
            chooser,
            max_weekly,
            quote: Arc::new(RwLock::new(initial_quote)),
        }
    }

    /// Handle to the store, for wiring the maintenance scheduler onto the
    /// same single-writer lock as request handling
    pub fn store_handle(&self) -> Arc<DailyTaskStore> {
        Arc::clone(&self.store)
    }

    /// Handle to the current-quote state, shared with the maintenance
    /// scheduler which resamples it daily
    pub fn quote_handle(&self) -> Arc<RwLock<&'static str>> {
        Arc::clone(&self.quote)
    }

    /// The quote sampled at startup or by the last maintenance firing
    pub async fn current_quote(&self) -> &'static str {
        *self.quote.read().await
    }

    /// Run a full planning cycle for a user: capacity from activity
    /// history, prompt from templates, generation, then persist the raw
    /// plan text as the new weekly batch.
    ///
    /// The generator call happens before any store lock is taken, so a slow
    /// or failing generation never blocks daily operations, and a failure
    /// leaves the previous batch and the history untouched.
    pub async fn generate_weekly_plan(&self, username: &str) -> Result<PlanSummary, EngineError> {
        let profile = self.profiles.read_profile(username)?;
        let capacity = weekly_capacity(profile.activity_history.len(), self.max_weekly);
        info!(user = %username, capacity, "generate_weekly_plan: planning cycle started");

        let prompt = build_plan_request(&profile, capacity);
        let text = self.generator.generate(&prompt).await?;
        debug!(response_len = text.len(), "generate_weekly_plan: generator responded");

        let records: Vec<TaskRecord> = split_task_blocks(&text).into_iter().map(TaskRecord::from_block).collect();
        if records.len() != capacity as usize {
            warn!(
                requested = capacity,
                parsed = records.len(),
                "generate_weekly_plan: batch size differs from requested capacity"
            );
        }

        self.store.persist_plan(username, self.clock.now(), &text).await?;

        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        Ok(PlanSummary {
            weekly_capacity: capacity,
            task_count: records.len(),
            preview,
        })
    }

    /// Resolve (or create) today's task entry. "No batch" and "empty batch"
    /// both surface as the no-tasks-available sentinel, not as failures.
    pub async fn today_task(&self) -> Result<TodayTask, EngineError> {
        let date = self.clock.today();
        match self.store.select_today(date, self.chooser.as_ref()).await {
            Ok(entry) => Ok(TodayTask {
                date,
                task: Some(entry.task),
                status: Some(entry.status),
            }),
            Err(EngineError::NotFound { .. }) | Err(EngineError::EmptyBatch) => {
                debug!(%date, "today_task: no tasks available");
                Ok(TodayTask {
                    date,
                    task: None,
                    status: None,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Mark today's entry Complete. Fails with NoEntryForToday when no
    /// entry exists; never fabricates one.
    pub async fn complete_today(&self) -> Result<DailyTaskEntry, EngineError> {
        self.store.complete_today(self.clock.today()).await
    }

    /// Full history, insertion-ordered, one entry per date
    pub async fn list_entries(&self) -> Result<Vec<DailyTaskEntry>, EngineError> {
        self.store.list_all().await
    }
}
