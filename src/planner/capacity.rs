//! Capacity planning from activity history
//!
//! Recent activity volume is a proxy for engagement: the more a user has
//! logged, the more daily tasks they can absorb, within fixed bounds.

/// Floor on the derived average daily task count
const MIN_AVG_DAILY: u32 = 3;

/// Ceiling on the derived average daily task count
const MAX_AVG_DAILY: u32 = 6;

/// Derive the number of tasks to generate for the coming week.
///
/// `avg_daily = clamp(history_count + 2, 3, 6)`, then
/// `weekly = min(max_weekly, avg_daily * 7)`.
///
/// `max_weekly` is validated positive at config load; this function never
/// fails.
pub fn weekly_capacity(history_count: usize, max_weekly: u32) -> u32 {
    let avg_daily = (history_count as u32).saturating_add(2).clamp(MIN_AVG_DAILY, MAX_AVG_DAILY);
    max_weekly.min(avg_daily * 7)
}
