//! Tracker session: the explicit context a screen works through.
//!
//! A session is created when a screen mounts and dropped when it goes away.
//! It pins `today`, so every evaluation inside one session agrees on the
//! date, and it owns the in-memory voting state for the day.

use crate::aggregator;
use crate::evaluator::TaskEvaluator;
use crate::reader::StoreReader;
use crate::recorder::ActivityRecorder;
use crate::store::ActivityStore;
use crate::streak;
use chrono::NaiveDate;
use magic_shared::dates::{format_date, DateRange};
use magic_shared::entries::{RankingBatch, RankingRecord};
use magic_shared::error::{MagicError, Result};
use magic_shared::keys::{DayKey, ALL_RANKINGS, FLAG_TRUE};
use magic_shared::rewards::StreakState;
use magic_shared::stats::RangeStats;
use magic_shared::streaks::{StreakStats, DEFAULT_MAX_LOOKBACK_DAYS};
use magic_shared::tasks::TaskSet;
use magic_shared::voting::{RankRejection, SubmittedBatch, VotingPhase, VotingRules, VotingSession};
use std::sync::Arc;
use tracing::info;

/// Tunables a session runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_lookback_days: u32,
    pub voting: VotingRules,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
            voting: VotingRules::default(),
        }
    }
}

pub struct TrackerSession {
    store: Arc<dyn ActivityStore>,
    today: NaiveDate,
    options: SessionOptions,
    voting: Option<VotingSession>,
}

impl TrackerSession {
    pub fn new(store: Arc<dyn ActivityStore>, today: NaiveDate, options: SessionOptions) -> Self {
        Self {
            store,
            today,
            options,
            voting: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn store(&self) -> &dyn ActivityStore {
        self.store.as_ref()
    }

    pub fn recorder(&self) -> ActivityRecorder<'_> {
        ActivityRecorder::new(self.store())
    }

    pub async fn evaluate_tasks(&self, date: NaiveDate) -> TaskSet {
        TaskEvaluator::load(self.store(), self.today)
            .await
            .evaluate(date)
            .await
    }

    pub async fn today_tasks(&self) -> TaskSet {
        self.evaluate_tasks(self.today).await
    }

    pub async fn has_any_activity_for_display(&self, date: NaiveDate) -> bool {
        self.evaluate_tasks(date).await.any()
    }

    pub async fn has_any_activity_for_streak(&self, date: NaiveDate) -> bool {
        streak::has_any_activity_for_streak(self.store(), date).await
    }

    pub async fn current_streak(&self) -> StreakState {
        streak::streak_state(self.store(), self.today, self.options.max_lookback_days).await
    }

    pub async fn streak_stats(&self) -> StreakStats {
        streak::streak_stats(self.store(), self.today, self.options.max_lookback_days).await
    }

    pub async fn aggregate(&self, range: DateRange) -> RangeStats {
        aggregator::aggregate(self.store(), range, self.today, self.options.max_lookback_days).await
    }

    /// Stats for the two-month calendar window ending with this month
    pub async fn calendar(&self) -> Result<RangeStats> {
        let range = DateRange::calendar_window(self.today)?;
        Ok(self.aggregate(range).await)
    }

    // ------------------------------------------------------------------
    // Voting
    // ------------------------------------------------------------------

    /// Start the day's voting with its first batch. A day already ranked
    /// goes straight to free browsing and `items` are ignored.
    pub async fn start_voting(&mut self, items: Vec<String>) -> Result<VotingPhase> {
        let ranked = StoreReader::new(self.store())
            .flag(&DayKey::Ranked.for_date(self.today))
            .await;

        let session = if ranked {
            VotingSession::completed(self.options.voting)
        } else {
            VotingSession::new(self.options.voting, items)?
        };
        let phase = session.phase();
        self.voting = Some(session);
        Ok(phase)
    }

    pub fn voting(&self) -> Option<&VotingSession> {
        self.voting.as_ref()
    }

    pub fn assign_rank(&mut self, item: &str, rank: u8) -> std::result::Result<(), RankRejection> {
        self.voting
            .as_mut()
            .ok_or(RankRejection::NotRanking)?
            .assign_rank(item, rank)
    }

    pub fn clear_rank(&mut self, item: &str) -> std::result::Result<Option<u8>, RankRejection> {
        self.voting
            .as_mut()
            .ok_or(RankRejection::NotRanking)?
            .clear_rank(item)
    }

    pub fn next_batch(&mut self, items: Vec<String>) -> std::result::Result<(), RankRejection> {
        self.voting
            .as_mut()
            .ok_or(RankRejection::NotRanking)?
            .begin_batch(items)
    }

    /// Submit the open batch and persist it. The in-memory session only
    /// advances once the writes succeed.
    pub async fn submit_batch(&mut self, submitted_at: Option<String>) -> Result<SubmittedBatch> {
        let current = self.voting.as_ref().ok_or(RankRejection::NotRanking)?;
        let mut next = current.clone();
        let mut submitted = next.submit()?;
        submitted.batch.submitted_at = submitted_at;

        self.persist_batch(&submitted.batch).await?;
        if submitted.completes_day {
            self.store
                .set(&DayKey::Ranked.for_date(self.today), FLAG_TRUE)
                .await?;
            info!("Voting complete for {}", self.today);
        }

        self.voting = Some(next);
        Ok(submitted)
    }

    /// Append the batch to the day's and the lifetime ranking history.
    /// A batch number is recorded once per day, so retrying a submit after
    /// a partial write does not duplicate it.
    async fn persist_batch(&self, batch: &RankingBatch) -> Result<()> {
        let recorder = self.recorder();
        let number = batch.batch;
        let date = format_date(self.today);

        recorder
            .append_to_list(
                &DayKey::Rankings.for_date(self.today),
                serde_json::to_value(batch)?,
                |v| v["batch"] == number,
            )
            .await?;

        let record = RankingRecord {
            date: date.clone(),
            batch: batch.clone(),
        };
        recorder
            .append_to_list(ALL_RANKINGS, serde_json::to_value(&record)?, |v| {
                v["date"] == date.as_str() && v["batch"] == number
            })
            .await?;
        Ok(())
    }

    /// Record browsing after the day's voting is done
    pub async fn record_browse(&self) -> Result<()> {
        let browsing = self.voting.as_ref().map(|v| v.can_browse()).unwrap_or(false);
        if !browsing {
            return Err(MagicError::Voting(
                "browsing unlocks after the day's batches are submitted".to_string(),
            ));
        }
        self.store
            .set(&DayKey::Browsed.for_date(self.today), FLAG_TRUE)
            .await
    }
}
