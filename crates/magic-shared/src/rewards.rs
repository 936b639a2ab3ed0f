//! Reward ladder for the streak arrow.
//!
//! A streak is consolidated greedily into years (365), months (30),
//! weeks (7) and days. These are display units, not calendar months.

use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR_UNIT: u32 = 365;
pub const DAYS_PER_MONTH_UNIT: u32 = 30;
pub const DAYS_PER_WEEK_UNIT: u32 = 7;

/// Streak length split into reward units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardUnits {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
}

impl RewardUnits {
    /// Recompose the streak length
    pub fn total_days(&self) -> u32 {
        self.years * DAYS_PER_YEAR_UNIT
            + self.months * DAYS_PER_MONTH_UNIT
            + self.weeks * DAYS_PER_WEEK_UNIT
            + self.days
    }

    /// Day units before today; the arrow draws today as its own marker
    pub fn past_day_units(&self) -> u32 {
        self.days.saturating_sub(1)
    }
}

/// Greedy (365, 30, 7, 1) decomposition of a streak length
pub fn decompose(streak_length: u32) -> RewardUnits {
    let years = streak_length / DAYS_PER_YEAR_UNIT;
    let rest = streak_length % DAYS_PER_YEAR_UNIT;
    let months = rest / DAYS_PER_MONTH_UNIT;
    let rest = rest % DAYS_PER_MONTH_UNIT;

    RewardUnits {
        years,
        months,
        weeks: rest / DAYS_PER_WEEK_UNIT,
        days: rest % DAYS_PER_WEEK_UNIT,
    }
}

/// Streak length together with its reward units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub length: u32,
    pub units: RewardUnits,
}

impl StreakState {
    pub fn new(length: u32) -> Self {
        Self {
            length,
            units: decompose(length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(decompose(0), RewardUnits::default());
        assert_eq!(decompose(0).past_day_units(), 0);
    }

    #[test]
    fn test_five_days() {
        let units = decompose(5);
        assert_eq!(units, RewardUnits { years: 0, months: 0, weeks: 0, days: 5 });
        assert_eq!(units.past_day_units(), 4);
    }

    #[test]
    fn test_four_hundred() {
        assert_eq!(decompose(400), RewardUnits { years: 1, months: 1, weeks: 0, days: 5 });
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(decompose(7), RewardUnits { weeks: 1, ..Default::default() });
        assert_eq!(decompose(30), RewardUnits { months: 1, ..Default::default() });
        assert_eq!(decompose(364), RewardUnits { years: 0, months: 12, weeks: 0, days: 4 });
        assert_eq!(decompose(365), RewardUnits { years: 1, ..Default::default() });
    }

    #[test]
    fn test_decomposition_is_complete_and_bounded() {
        for s in 0..=2000 {
            let units = decompose(s);
            assert_eq!(units.total_days(), s, "recompose failed for {}", s);
            assert!(units.months <= 12);
            assert!(units.weeks <= 4);
            assert!(units.days <= 6);
        }
    }
}
