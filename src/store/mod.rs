//! Daily task store
//!
//! Owns the weekly batch file and the per-date history, and is the only
//! component allowed to mutate them. Every mutation is a read-modify-write
//! of shared on-disk state: the existence check in `select_today` and the
//! append that follows it must be atomic with respect to other writers or
//! two requests on the same date could each create an entry. Writers come
//! from two sides, tasks inside one process (requests vs the daemon sweep)
//! and other habitd processes sharing the data dir (a CLI invocation racing
//! the daemon), so mutations hold both an in-process async mutex and an
//! advisory file lock on the data dir.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use fs2::FileExt;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{DailyTaskEntry, HistoryFile};
use crate::error::EngineError;
use crate::planner::split_task_blocks;
use crate::random::Chooser;

/// File name of the persisted weekly batch
const BATCH_FILE: &str = "weekly_plan.txt";

/// File name of the persisted daily history
const HISTORY_FILE: &str = "history.json";

/// Lock file serializing mutations across processes
const LOCK_FILE: &str = "store.lock";

/// Exclusive advisory lock held for the duration of one mutation. Released
/// on drop; the OS also releases it if the process dies mid-write.
struct StoreLockGuard {
    file: std::fs::File,
}

impl Drop for StoreLockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// File-backed store for the weekly batch and daily history
pub struct DailyTaskStore {
    data_dir: PathBuf,
    batch_path: PathBuf,
    history_path: PathBuf,

    /// In-process half of the single-writer discipline; `lock_store` covers
    /// the cross-process half
    write_lock: Mutex<()>,
}

impl DailyTaskStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let batch_path = data_dir.join(BATCH_FILE);
        let history_path = data_dir.join(HISTORY_FILE);
        Self {
            data_dir,
            batch_path,
            history_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Take the cross-process lock for one mutation. The in-process mutex
    /// only covers callers within this process; the daemon's sweep and a
    /// concurrent CLI invocation are separate processes over the same files,
    /// so every read-modify-write also holds this advisory lock. Acquisition
    /// blocks, hence the spawn_blocking.
    async fn lock_store(&self) -> Result<StoreLockGuard, EngineError> {
        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| EngineError::persistence(&self.data_dir, e))?;

        let lock_path = self.data_dir.join(LOCK_FILE);
        let path = lock_path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<StoreLockGuard> {
            let file = std::fs::OpenOptions::new().create(true).write(true).open(&path)?;
            file.lock_exclusive()?;
            Ok(StoreLockGuard { file })
        })
        .await
        .map_err(|e| EngineError::persistence(&lock_path, e))?
        .map_err(|e| EngineError::persistence(&lock_path, e))
    }

    /// Read the full history, normalizing the legacy single-record form
    /// into a one-element sequence. Absent file means empty history.
    async fn load_history(&self) -> Result<Vec<DailyTaskEntry>, EngineError> {
        if !self.history_path.exists() {
            debug!(path = ?self.history_path, "load_history: no history file yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.history_path)
            .await
            .map_err(|e| EngineError::persistence(&self.history_path, e))?;

        let history: HistoryFile =
            serde_json::from_str(&content).map_err(|e| EngineError::persistence(&self.history_path, e))?;

        Ok(history.into_entries())
    }

    /// Write the full history atomically (temp file + rename). Callers must
    /// hold both locks. Always writes the sequence form, which migrates
    /// a legacy file on its first update. The temp name carries the pid so
    /// writers never consume each other's temp file.
    async fn persist_history(&self, entries: &[DailyTaskEntry]) -> Result<(), EngineError> {
        let json =
            serde_json::to_string_pretty(entries).map_err(|e| EngineError::persistence(&self.history_path, e))?;

        let tmp_path = self.history_path.with_extension(format!("json.{}.tmp", std::process::id()));
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| EngineError::persistence(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.history_path)
            .await
            .map_err(|e| EngineError::persistence(&self.history_path, e))?;

        debug!(entries = entries.len(), "persist_history: written");
        Ok(())
    }

    /// Persist a freshly generated plan: header line, generation timestamp,
    /// then the generator's numbered list verbatim.
    pub async fn persist_plan(
        &self,
        username: &str,
        generated_at: NaiveDateTime,
        text: &str,
    ) -> Result<(), EngineError> {
        let _guard = self.write_lock.lock().await;
        let _flock = self.lock_store().await?;

        let content = format!(
            "Weekly plan for {}\nGenerated: {}\n\n{}",
            username,
            generated_at.format("%Y-%m-%d %H:%M:%S"),
            text
        );

        let tmp_path = self.batch_path.with_extension(format!("txt.{}.tmp", std::process::id()));
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| EngineError::persistence(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.batch_path)
            .await
            .map_err(|e| EngineError::persistence(&self.batch_path, e))?;

        info!(user = %username, "persist_plan: weekly batch replaced");
        Ok(())
    }

    /// Parse the current weekly batch into raw task blocks
    async fn load_batch_blocks(&self) -> Result<Vec<String>, EngineError> {
        if !self.batch_path.exists() {
            return Err(EngineError::not_found("weekly batch file"));
        }

        let content = fs::read_to_string(&self.batch_path)
            .await
            .map_err(|e| EngineError::persistence(&self.batch_path, e))?;

        Ok(split_task_blocks(&content))
    }

    /// Resolve (or create) the entry for `date`.
    ///
    /// Idempotent: if an entry already exists it is returned unchanged with
    /// no history mutation. Otherwise one record is chosen uniformly from
    /// the current batch, a NotNow entry is appended, and the full history
    /// is persisted atomically. A missing batch file is NotFound and an
    /// unparsable one is EmptyBatch; neither creates a history entry.
    pub async fn select_today(&self, date: NaiveDate, chooser: &dyn Chooser) -> Result<DailyTaskEntry, EngineError> {
        let _guard = self.write_lock.lock().await;
        let _flock = self.lock_store().await?;

        let mut entries = self.load_history().await?;
        if let Some(existing) = entries.iter().find(|e| e.date == date) {
            debug!(%date, status = %existing.status, "select_today: entry already exists");
            return Ok(existing.clone());
        }

        let blocks = self.load_batch_blocks().await?;
        let Some(index) = chooser.choose(blocks.len()) else {
            return Err(EngineError::EmptyBatch);
        };

        let entry = DailyTaskEntry::new(date, blocks[index].clone());
        info!(%date, index, "select_today: selected task for new entry");

        entries.push(entry.clone());
        self.persist_history(&entries).await?;

        Ok(entry)
    }

    /// Mark today's entry Complete. Completing an already-Complete entry is
    /// a no-op success; a missing entry is a failure, never fabricated.
    pub async fn complete_today(&self, date: NaiveDate) -> Result<DailyTaskEntry, EngineError> {
        let _guard = self.write_lock.lock().await;
        let _flock = self.lock_store().await?;

        let mut entries = self.load_history().await?;
        let Some(entry) = entries.iter_mut().find(|e| e.date == date) else {
            return Err(EngineError::NoEntryForToday);
        };

        if entry.complete() {
            info!(%date, "complete_today: entry marked complete");
            let updated = entry.clone();
            self.persist_history(&entries).await?;
            return Ok(updated);
        }

        debug!(%date, "complete_today: already complete, no-op");
        Ok(entry.clone())
    }

    /// The sweep: expire today's entry if it is still NotNow. Idempotent —
    /// returns whether a transition actually happened.
    pub async fn sweep(&self, date: NaiveDate) -> Result<bool, EngineError> {
        let _guard = self.write_lock.lock().await;
        let _flock = self.lock_store().await?;

        let mut entries = self.load_history().await?;
        let Some(entry) = entries.iter_mut().find(|e| e.date == date) else {
            debug!(%date, "sweep: no entry for date, nothing to do");
            return Ok(false);
        };

        if entry.expire() {
            info!(%date, "sweep: entry expired to Incomplete");
            self.persist_history(&entries).await?;
            return Ok(true);
        }

        debug!(%date, status = %entry.status, "sweep: entry already resolved");
        Ok(false)
    }

    /// Read-only projection of the full history in insertion order
    pub async fn list_all(&self) -> Result<Vec<DailyTaskEntry>, EngineError> {
        self.load_history().await
    }
}
