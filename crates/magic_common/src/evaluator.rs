//! Daily task evaluation.
//!
//! Collections that span all of history (artwork lists, the weekly art
//! counter) are loaded once per evaluator; per-day keys are read on each
//! `evaluate` call. Evaluation never writes.

use crate::reader::StoreReader;
use crate::store::ActivityStore;
use chrono::NaiveDate;
use magic_shared::dates::{in_week, week_start};
use magic_shared::keys::{
    DayKey, FAVORITE_ARTWORKS, PRIVATE_ARTWORKS, PUBLIC_ARTWORKS, WEEKLY_ART_TIME, WEEK_START_DATE,
};
use magic_shared::tasks::TaskSet;
use std::collections::BTreeSet;
use tracing::debug;

/// Weekly cumulative art timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyArtTime {
    pub seconds: u64,
    /// Monday the counter belongs to
    pub week_start: NaiveDate,
}

impl WeeklyArtTime {
    /// The counter credits `date` when it is non-zero, `date` is in its week
    /// and `date` is not in the future
    pub fn credits(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.seconds > 0 && date <= today && in_week(date, self.week_start)
    }
}

/// Evaluates the five tasks for arbitrary dates relative to a fixed `today`
pub struct TaskEvaluator<'a> {
    reader: StoreReader<'a>,
    today: NaiveDate,
    weekly: WeeklyArtTime,
    artwork_days: BTreeSet<NaiveDate>,
    favorite_days: BTreeSet<NaiveDate>,
}

impl<'a> TaskEvaluator<'a> {
    pub async fn load(store: &'a dyn ActivityStore, today: NaiveDate) -> TaskEvaluator<'a> {
        let reader = StoreReader::new(store);

        let weekly = WeeklyArtTime {
            seconds: reader.counter(WEEKLY_ART_TIME).await,
            week_start: reader
                .date(WEEK_START_DATE)
                .await
                .unwrap_or_else(|| week_start(today)),
        };

        let mut artwork_days = reader.artwork_dates(PUBLIC_ARTWORKS).await;
        artwork_days.extend(reader.artwork_dates(PRIVATE_ARTWORKS).await);
        let favorite_days = reader.artwork_dates(FAVORITE_ARTWORKS).await;

        Self {
            reader,
            today,
            weekly,
            artwork_days,
            favorite_days,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn weekly_art_time(&self) -> WeeklyArtTime {
        self.weekly
    }

    /// Task completion for `date`
    pub async fn evaluate(&self, date: NaiveDate) -> TaskSet {
        let (manifest, goal) = match self.reader.manifest(date).await {
            Some(entry) => (entry.has_journal_text(), entry.has_goal()),
            None => (false, false),
        };

        let art = self.weekly.credits(date, self.today)
            || self.reader.counter(&DayKey::ArtTime.for_date(date)).await > 0
            || self.reader.flag(&DayKey::ArtCreated.for_date(date)).await
            || self.artwork_days.contains(&date);

        let inspire = self.reader.flag(&DayKey::Ranked.for_date(date)).await;

        let connect = (inspire && self.reader.flag(&DayKey::Browsed.for_date(date)).await)
            || self.reader.flag(&DayKey::EmailSent.for_date(date)).await
            || self.favorite_days.contains(&date);

        let tasks = TaskSet {
            manifest,
            art,
            goal,
            inspire,
            connect,
        };
        debug!("Tasks for {}: {}/5", date, tasks.count());
        tasks
    }

    /// Any of the five tasks done on `date`; the daily-completion notion of activity
    pub async fn has_any_activity_for_display(&self, date: NaiveDate) -> bool {
        self.evaluate(date).await.any()
    }
}

/// Evaluate a single date without keeping the evaluator around
pub async fn evaluate_tasks(store: &dyn ActivityStore, date: NaiveDate, today: NaiveDate) -> TaskSet {
    TaskEvaluator::load(store, today).await.evaluate(date).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use magic_shared::dates::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[tokio::test]
    async fn test_goal_only_entry() {
        let store = MemoryStore::with_entries([(
            "manifest_2024-03-01",
            r#"{"callMuse":"","dumpStalls":"","manifestVision":"","growthGoal":"Paint daily"}"#,
        )]);
        let tasks = evaluate_tasks(&store, d("2024-03-01"), d("2024-03-01")).await;
        assert_eq!(
            tasks,
            TaskSet { manifest: false, art: false, goal: true, inspire: false, connect: false }
        );
    }

    #[tokio::test]
    async fn test_weekly_counter_credits_only_its_week() {
        let store = MemoryStore::with_entries([
            ("weekly_art_time", "600"),
            ("week_start_date", "2024-03-04"),
        ]);
        let evaluator = TaskEvaluator::load(&store, d("2024-03-06")).await;

        assert!(evaluator.evaluate(d("2024-03-04")).await.art);
        assert!(evaluator.evaluate(d("2024-03-06")).await.art);
        // Later in the week but after today
        assert!(!evaluator.evaluate(d("2024-03-07")).await.art);
        // Previous week
        assert!(!evaluator.evaluate(d("2024-03-03")).await.art);
    }

    #[tokio::test]
    async fn test_weekly_counter_defaults_to_todays_week() {
        let store = MemoryStore::with_entries([("weekly_art_time", "60")]);
        let evaluator = TaskEvaluator::load(&store, d("2024-03-06")).await;
        assert_eq!(evaluator.weekly_art_time().week_start, d("2024-03-04"));
        assert!(evaluator.evaluate(d("2024-03-05")).await.art);
    }

    #[tokio::test]
    async fn test_zero_counter_does_not_credit() {
        let store = MemoryStore::with_entries([("weekly_art_time", "0")]);
        let tasks = evaluate_tasks(&store, d("2024-03-06"), d("2024-03-06")).await;
        assert!(!tasks.art);
    }

    #[tokio::test]
    async fn test_connect_needs_browse_after_vote() {
        let store = MemoryStore::with_entries([("browsed_2024-03-01", "true")]);
        let tasks = evaluate_tasks(&store, d("2024-03-01"), d("2024-03-01")).await;
        assert!(!tasks.connect);

        store.set("ranked_2024-03-01", "true").await.unwrap();
        let tasks = evaluate_tasks(&store, d("2024-03-01"), d("2024-03-01")).await;
        assert!(tasks.inspire);
        assert!(tasks.connect);
    }

    #[tokio::test]
    async fn test_partial_ranked_value_does_not_count() {
        let store = MemoryStore::with_entries([("ranked_2024-03-01", "1")]);
        let tasks = evaluate_tasks(&store, d("2024-03-01"), d("2024-03-01")).await;
        assert!(!tasks.inspire);
    }
}
