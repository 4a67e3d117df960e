//! habitd - Adaptive Daily Task Engine
//!
//! habitd turns a user's task templates into a weekly batch of concrete
//! tasks sized to their demonstrated capacity, then serves exactly one task
//! per calendar day and tracks how each day resolved.
//!
//! # Core Concepts
//!
//! - **Capacity from history**: recent activity volume sets how many tasks
//!   are generated per week, within fixed bounds
//! - **Opaque generation**: the external text generator returns free text;
//!   a tolerant line-heuristic parser splits it into task blocks
//! - **One entry per date**: the daily store enforces a single entry per
//!   calendar day through a single-writer lock
//! - **Daily sweep**: a background scheduler finalizes unresolved days as
//!   Incomplete at a configured wall-clock time
//!
//! # Modules
//!
//! - [`planner`] - Capacity planning, prompt construction, response parsing
//! - [`generator`] - External text generator trait and HTTP client
//! - [`store`] - Per-date history and batch persistence, status state machine
//! - [`maintenance`] - Daily sweep scheduler and quote rotation
//! - [`engine`] - Boundary facade tying the above together
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod generator;
pub mod maintenance;
pub mod planner;
pub mod random;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, GeneratorConfig, MaintenanceConfig, PlanningConfig, StorageConfig};
pub use domain::{ActivityHistoryEntry, DailyTaskEntry, JsonProfileStore, ProfileStore, TaskStatus, TaskTemplate, UserProfile};
pub use engine::{PlanSummary, TaskEngine, TodayTask};
pub use error::EngineError;
pub use generator::{AnthropicGenerator, GeneratorError, TextGenerator, create_generator};
pub use maintenance::{MaintenanceScheduler, QUOTES, SweepReport, pick_quote};
pub use planner::{TaskRecord, build_plan_request, split_task_blocks, weekly_capacity};
pub use random::{Chooser, FixedChooser, RandChooser};
pub use store::DailyTaskStore;
