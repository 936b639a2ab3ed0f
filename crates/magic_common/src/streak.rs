//! Backbone streak over the store.
//!
//! The streak counts a day when it has a manifest entry, a completed
//! ranking, or a public artwork. This is narrower than the five-task union
//! used for daily display: art-timer-only and connect-only days do not
//! extend the streak.

use crate::reader::StoreReader;
use crate::store::ActivityStore;
use chrono::NaiveDate;
use magic_shared::keys::{DayKey, PUBLIC_ARTWORKS};
use magic_shared::rewards::StreakState;
use magic_shared::streaks::{self, StreakStats};
use std::collections::BTreeSet;
use tracing::debug;

/// Every date that counts toward the streak, across all history
pub async fn streak_activity_dates(store: &dyn ActivityStore) -> BTreeSet<NaiveDate> {
    let reader = StoreReader::new(store);

    let mut active = reader.dates_with(DayKey::Manifest).await;

    for key in reader.keys_with_prefix(DayKey::Ranked.prefix()).await {
        if let Some(date) = DayKey::Ranked.date_of(&key) {
            if reader.flag(&key).await {
                active.insert(date);
            }
        }
    }

    active.extend(reader.artwork_dates(PUBLIC_ARTWORKS).await);
    active
}

/// Whether `date` counts toward the streak
pub async fn has_any_activity_for_streak(store: &dyn ActivityStore, date: NaiveDate) -> bool {
    let reader = StoreReader::new(store);
    reader.contains(&DayKey::Manifest.for_date(date)).await
        || reader.flag(&DayKey::Ranked.for_date(date)).await
        || reader.artwork_dates(PUBLIC_ARTWORKS).await.contains(&date)
}

/// Current streak ending today, or yesterday when today is still empty
pub async fn current_streak(store: &dyn ActivityStore, today: NaiveDate, max_lookback_days: u32) -> u32 {
    let active = streak_activity_dates(store).await;
    let length = streaks::current_streak(&active, today, max_lookback_days);
    debug!("Current streak at {}: {} days", today, length);
    length
}

/// Current streak with its reward units
pub async fn streak_state(store: &dyn ActivityStore, today: NaiveDate, max_lookback_days: u32) -> StreakState {
    StreakState::new(current_streak(store, today, max_lookback_days).await)
}

/// Current, best and active-day counts in one pass
pub async fn streak_stats(store: &dyn ActivityStore, today: NaiveDate, max_lookback_days: u32) -> StreakStats {
    let active = streak_activity_dates(store).await;
    streaks::calculate_streaks(&active, today, max_lookback_days)
}
