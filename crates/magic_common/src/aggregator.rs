//! Calendar and lifetime statistics.
//!
//! `per_day` covers only the requested range. Everything else is a
//! lifetime total, since the streak screen shows those next to a
//! two-month calendar.

use crate::evaluator::TaskEvaluator;
use crate::reader::StoreReader;
use crate::store::ActivityStore;
use crate::streak::streak_activity_dates;
use chrono::NaiveDate;
use magic_shared::dates::DateRange;
use magic_shared::entries::ManifestEntry;
use magic_shared::keys::{DayKey, ACK_YES, PUBLIC_ARTWORKS};
use magic_shared::stats::RangeStats;
use magic_shared::streaks;
use tracing::debug;

/// Aggregate stats for `range`, relative to `today`
pub async fn aggregate(
    store: &dyn ActivityStore,
    range: DateRange,
    today: NaiveDate,
    max_lookback_days: u32,
) -> RangeStats {
    let reader = StoreReader::new(store);
    let evaluator = TaskEvaluator::load(store, today).await;

    let mut stats = RangeStats::default();
    for date in range.days() {
        let tasks = evaluator.evaluate(date).await;
        if tasks.any() {
            stats.per_day.insert(date, tasks);
        }
    }

    let active = streak_activity_dates(store).await;
    stats.current_streak = streaks::current_streak(&active, today, max_lookback_days);
    stats.longest_streak = streaks::longest_streak(&active);
    stats.total_active_days = active.len() as u32;

    let manifest_keys = reader.keys_with_prefix(DayKey::Manifest.prefix()).await;
    stats.manifest_days = manifest_keys.len() as u32;
    for key in &manifest_keys {
        if let Some(entry) = reader.json::<ManifestEntry>(key).await {
            if entry.has_goal() {
                stats.goals_set += 1;
            }
        }
    }

    for key in reader.keys_with_prefix(DayKey::GoalAcknowledged.prefix()).await {
        if reader.raw(&key).await.as_deref() == Some(ACK_YES) {
            stats.goals_met += 1;
        }
    }

    stats.inspire_days = reader.keys_with_prefix(DayKey::Ranked.prefix()).await.len() as u32;
    stats.courage_posts = reader.artworks(PUBLIC_ARTWORKS).await.len() as u32;

    debug!(
        "Aggregated {} active days in {}..={}",
        stats.per_day.len(),
        range.start,
        range.end
    );
    stats
}
