//! Streak calculation over a set of active days.
//!
//! The current streak is lenient about today: an empty today does not break
//! the streak, counting starts from yesterday instead. The longest streak
//! uses exact day adjacency.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ten years of days; the backward walk never goes further
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 3650;

/// Streak statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Longest run of adjacent active days ever
    pub best_streak: u32,
    /// Distinct active days
    pub active_days: u32,
}

/// Current streak for an arbitrary activity predicate
pub fn current_streak_by<F>(today: NaiveDate, max_lookback_days: u32, is_active: F) -> u32
where
    F: Fn(NaiveDate) -> bool,
{
    let mut day = if is_active(today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0u32;
    for _ in 0..max_lookback_days {
        match day {
            Some(d) if is_active(d) => {
                streak += 1;
                day = d.pred_opt();
            }
            _ => break,
        }
    }
    streak
}

/// Current streak over a set of active days
pub fn current_streak(active: &BTreeSet<NaiveDate>, today: NaiveDate, max_lookback_days: u32) -> u32 {
    current_streak_by(today, max_lookback_days, |d| active.contains(&d))
}

/// Longest run of exactly adjacent days
pub fn longest_streak(active: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for day in active {
        run = match prev {
            Some(p) if p.succ_opt() == Some(*day) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(*day);
    }
    best
}

/// Calculate all streak statistics at once
pub fn calculate_streaks(active: &BTreeSet<NaiveDate>, today: NaiveDate, max_lookback_days: u32) -> StreakStats {
    StreakStats {
        current_streak: current_streak(active, today, max_lookback_days),
        best_streak: longest_streak(active),
        active_days: active.len() as u32,
    }
}
