//! Weekly planning: capacity derivation, prompt construction, response parsing

mod capacity;
mod parser;
mod prompt;

pub use capacity::weekly_capacity;
pub use parser::{TaskRecord, split_task_blocks};
pub use prompt::build_plan_request;
