//! Calendar and lifetime statistics for the streak screen.

use crate::tasks::{Task, TaskSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated stats for a calendar range plus lifetime totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeStats {
    /// Days in the requested range with at least one task done
    pub per_day: BTreeMap<NaiveDate, TaskSet>,
    pub current_streak: u32,
    /// Lifetime, by exact day adjacency
    pub longest_streak: u32,
    /// Lifetime distinct active days
    pub total_active_days: u32,
    pub goals_set: u32,
    pub goals_met: u32,
    /// Lifetime count of manifest entries
    pub manifest_days: u32,
    /// Lifetime count of ranked days
    pub inspire_days: u32,
    /// Lifetime count of public artworks
    pub courage_posts: u32,
}

impl RangeStats {
    /// Task set for a day; `None` when nothing was done
    pub fn day(&self, date: NaiveDate) -> Option<&TaskSet> {
        self.per_day.get(&date)
    }

    /// Rounded percentage of set goals that were met
    pub fn goal_completion_pct(&self) -> u32 {
        if self.goals_set == 0 {
            0
        } else {
            ((self.goals_met as f64 / self.goals_set as f64) * 100.0).round() as u32
        }
    }

    /// Days in range on which `task` was done
    pub fn task_days(&self, task: Task) -> usize {
        self.per_day.values().filter(|set| set.get(task)).count()
    }
}
