//! Injectable clock
//!
//! All date/time reads in the engine go through this trait so tests can
//! advance a fake clock instead of waiting on wall-clock time. Sweep times
//! are interpreted in server-local time.

use std::sync::Mutex;

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of "now" for the engine and scheduler
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Current calendar date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall-clock time in the server's local timezone
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Settable clock for deterministic tests
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Move the clock to a new instant
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().expect("clock mutex poisoned") = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().expect("clock mutex poisoned")
    }
}
