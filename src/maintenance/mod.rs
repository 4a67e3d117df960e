//! Daily maintenance scheduler
//!
//! Fires once per day at a configured wall-clock time. Each firing
//! resamples the motivational quote, then runs the sweep that finalizes an
//! unresolved daily entry as Incomplete. Firing is independent of request
//! handling and idempotent under repeated runs on the same date.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDateTime, NaiveTime};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::error::EngineError;
use crate::random::Chooser;
use crate::store::DailyTaskStore;

/// Static pool the daily motivational quote is resampled from
pub const QUOTES: &[&str] = &[
    "Small steps every day add up.",
    "Done is better than perfect.",
    "Show up for yourself today.",
    "One task at a time.",
    "Consistency beats intensity.",
    "Future you will thank present you.",
    "Progress, not perfection.",
    "The streak starts today.",
];

/// Pick a quote from the pool
pub fn pick_quote(chooser: &dyn Chooser) -> &'static str {
    // The pool is non-empty, so choose always returns an index
    QUOTES[chooser.choose(QUOTES.len()).unwrap_or(0)]
}

/// What a single maintenance firing did
#[derive(Debug)]
pub struct SweepReport {
    /// The freshly sampled quote
    pub quote: &'static str,
    /// Whether today's entry transitioned NotNow -> Incomplete
    pub expired: bool,
}

/// Compute the next firing instant strictly after `now`
fn next_fire(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    if now.time() < at {
        now.date().and_time(at)
    } else {
        (now.date() + Days::new(1)).and_time(at)
    }
}

/// Background scheduler for the daily sweep
pub struct MaintenanceScheduler {
    sweep_time: NaiveTime,
    clock: Arc<dyn Clock>,
    chooser: Arc<dyn Chooser>,
    store: Arc<DailyTaskStore>,
    /// Process-owned current quote, shared with the engine
    quote: Arc<RwLock<&'static str>>,
}

impl MaintenanceScheduler {
    pub fn new(
        sweep_time: NaiveTime,
        clock: Arc<dyn Clock>,
        chooser: Arc<dyn Chooser>,
        store: Arc<DailyTaskStore>,
        quote: Arc<RwLock<&'static str>>,
    ) -> Self {
        Self {
            sweep_time,
            clock,
            chooser,
            store,
            quote,
        }
    }

    /// One maintenance firing: resample the quote, then sweep today's entry
    pub async fn fire_once(&self) -> Result<SweepReport, EngineError> {
        let fresh = pick_quote(self.chooser.as_ref());
        *self.quote.write().await = fresh;
        debug!(quote = fresh, "fire_once: quote resampled");

        let today = self.clock.today();
        let expired = self.store.sweep(today).await?;
        info!(%today, expired, "fire_once: sweep done");

        Ok(SweepReport { quote: fresh, expired })
    }

    /// Run until the shutdown channel yields. Sleeps to the next configured
    /// wall-clock firing, fires, and repeats.
    pub async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(sweep_time = %self.sweep_time, "maintenance scheduler started");

        loop {
            let now = self.clock.now();
            let target = next_fire(now, self.sweep_time);
            let sleep_for = (target - now).to_std().unwrap_or(Duration::ZERO);
            debug!(%target, ?sleep_for, "scheduler: sleeping until next firing");

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {
                    if let Err(e) = self.fire_once().await {
                        // A failed sweep must not kill the scheduler; the
                        // next firing retries against current state
                        error!(error = %e, "maintenance firing failed");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("maintenance scheduler shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::TaskStatus;
    use crate::random::FixedChooser;
    use tempfile::TempDir;

    fn dt(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_next_fire_same_day() {
        let next = next_fire(dt("2025-06-01T10:00:00"), NaiveTime::from_hms_opt(18, 30, 0).unwrap());
        assert_eq!(next, dt("2025-06-01T18:30:00"));
    }

    #[test]
    fn test_next_fire_rolls_to_tomorrow() {
        let at = NaiveTime::from_hms_opt(18, 30, 0).unwrap();
        assert_eq!(next_fire(dt("2025-06-01T18:30:00"), at), dt("2025-06-02T18:30:00"));
        assert_eq!(next_fire(dt("2025-06-01T23:59:00"), at), dt("2025-06-02T18:30:00"));
    }

    #[test]
    fn test_pick_quote_deterministic() {
        assert_eq!(pick_quote(&FixedChooser::new(2)), QUOTES[2]);
    }

    async fn scheduler_fixture(temp: &TempDir, clock: Arc<FixedClock>) -> (MaintenanceScheduler, Arc<DailyTaskStore>) {
        let store = Arc::new(DailyTaskStore::new(temp.path()));
        tokio::fs::write(
            temp.path().join("weekly_plan.txt"),
            "1. Title: Walk\nArea: Fitness\n",
        )
        .await
        .unwrap();

        let quote = Arc::new(RwLock::new(QUOTES[0]));
        let scheduler = MaintenanceScheduler::new(
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            clock,
            Arc::new(FixedChooser::new(3)),
            Arc::clone(&store),
            quote,
        );
        (scheduler, store)
    }

    #[tokio::test]
    async fn test_fire_once_expires_not_now() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::new(dt("2025-06-01T18:30:00")));
        let (scheduler, store) = scheduler_fixture(&temp, Arc::clone(&clock)).await;

        store
            .select_today(clock.today(), &FixedChooser::new(0))
            .await
            .unwrap();

        let report = scheduler.fire_once().await.unwrap();
        assert!(report.expired);
        assert_eq!(report.quote, QUOTES[3]);
        assert_eq!(store.list_all().await.unwrap()[0].status, TaskStatus::Incomplete);

        // Refiring on the same date does not advance or revert
        let report = scheduler.fire_once().await.unwrap();
        assert!(!report.expired);
        assert_eq!(store.list_all().await.unwrap()[0].status, TaskStatus::Incomplete);
    }

    #[tokio::test]
    async fn test_fire_once_without_entry_is_noop() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::new(dt("2025-06-01T18:30:00")));
        let (scheduler, store) = scheduler_fixture(&temp, clock).await;

        let report = scheduler.fire_once().await.unwrap();
        assert!(!report.expired);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fire_once_leaves_completed_entry() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::new(dt("2025-06-01T18:30:00")));
        let (scheduler, store) = scheduler_fixture(&temp, Arc::clone(&clock)).await;

        store
            .select_today(clock.today(), &FixedChooser::new(0))
            .await
            .unwrap();
        store.complete_today(clock.today()).await.unwrap();

        let report = scheduler.fire_once().await.unwrap();
        assert!(!report.expired);
        assert_eq!(store.list_all().await.unwrap()[0].status, TaskStatus::Complete);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::new(dt("2025-06-01T10:00:00")));
        let (scheduler, _store) = scheduler_fixture(&temp, clock).await;

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let handle = tokio::spawn(scheduler.run(shutdown_rx));

        shutdown_tx.send(()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler should shut down")
            .unwrap();
    }
}
