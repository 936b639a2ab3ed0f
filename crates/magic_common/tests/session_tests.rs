//! End-to-end tests through TrackerSession.

use chrono::NaiveDate;
use magic_common::{ActivityStore, MemoryStore, SessionOptions, SqliteStore, TrackerSession};
use magic_shared::dates::{parse_date, DateRange};
use magic_shared::entries::{ArtworkRecord, ManifestEntry, RankingBatch, Visibility};
use magic_shared::rewards::RewardUnits;
use magic_shared::tasks::TaskSet;
use magic_shared::voting::{RankRejection, VotingPhase, VotingRules};
use magic_shared::MagicError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

fn d(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn session(store: Arc<dyn ActivityStore>, today: &str) -> TrackerSession {
    TrackerSession::new(store, d(today), SessionOptions::default())
}

fn batch(prefix: &str) -> Vec<String> {
    (1..=4).map(|i| format!("{}-{}", prefix, i)).collect()
}

fn rank_in_order(tracker: &mut TrackerSession, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        tracker.assign_rank(item, (i + 1) as u8).unwrap();
    }
}

/// Memory store whose first write to a `ranked_` key fails
#[derive(Default)]
struct FailRankedOnce {
    inner: MemoryStore,
    failed: AtomicBool,
}

#[async_trait::async_trait]
impl ActivityStore for FailRankedOnce {
    async fn get(&self, key: &str) -> magic_shared::error::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> magic_shared::error::Result<()> {
        if key.starts_with("ranked_") && !self.failed.swap(true, Ordering::SeqCst) {
            return Err(MagicError::Store("disk full".to_string()));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> magic_shared::error::Result<()> {
        self.inner.remove(key).await
    }

    async fn keys(&self) -> magic_shared::error::Result<Vec<String>> {
        self.inner.keys().await
    }
}

#[tokio::test]
async fn test_scenario_goal_only_manifest() {
    let store = Arc::new(MemoryStore::with_entries([(
        "manifest_2024-03-01",
        r#"{"callMuse":"","dumpStalls":"","manifestVision":"","growthGoal":"Paint daily","savedAt":"2024-03-01T08:00:00Z"}"#,
    )]));
    let session = session(store, "2024-03-01");

    let tasks = session.today_tasks().await;
    assert_eq!(
        tasks,
        TaskSet { manifest: false, goal: true, art: false, inspire: false, connect: false }
    );
}

#[tokio::test]
async fn test_scenario_five_day_streak() {
    let store = Arc::new(MemoryStore::new());
    let tracker = session(store.clone(), "2024-03-05");
    let entry = ManifestEntry {
        call_muse: "morning pages".to_string(),
        ..Default::default()
    };
    for day in d("2024-03-01").iter_days().take(5) {
        tracker.recorder().save_manifest(day, &entry).await.unwrap();
    }

    let state = tracker.current_streak().await;
    assert_eq!(state.length, 5);
    assert_eq!(state.units, RewardUnits { years: 0, months: 0, weeks: 0, days: 5 });
    assert_eq!(state.units.past_day_units(), 4);

    // Nothing after the 5th: the 7th sees an empty 6th and 7th
    let later = session(store, "2024-03-07");
    assert_eq!(later.current_streak().await.length, 0);
}

#[tokio::test]
async fn test_scenario_skip_empty_today() {
    let store = Arc::new(MemoryStore::with_entries([("ranked_2024-03-04", "true")]));
    let tracker = session(store, "2024-03-05");
    assert_eq!(tracker.current_streak().await.length, 1);
}

#[tokio::test]
async fn test_evaluation_is_idempotent() {
    let store = Arc::new(MemoryStore::with_entries([
        ("manifest_2024-03-01", r#"{"dumpStalls":"fear of blank page"}"#),
        ("weekly_art_time", "1200"),
        ("week_start_date", "2024-02-26"),
        ("email_sent_2024-03-01", "true"),
    ]));
    let tracker = session(store, "2024-03-01");

    let first = tracker.evaluate_tasks(d("2024-03-01")).await;
    let second = tracker.evaluate_tasks(d("2024-03-01")).await;
    assert_eq!(first, second);
    assert!(first.manifest && first.art && first.connect);
    assert!(!first.goal && !first.inspire);
}

#[tokio::test]
async fn test_display_and_streak_activity_differ() {
    let store = Arc::new(MemoryStore::with_entries([
        ("art_created_2024-03-04", "true"),
        ("email_sent_2024-03-04", "true"),
    ]));
    let tracker = session(store, "2024-03-05");

    assert!(tracker.has_any_activity_for_display(d("2024-03-04")).await);
    assert!(!tracker.has_any_activity_for_streak(d("2024-03-04")).await);
    assert_eq!(tracker.current_streak().await.length, 0);
}

#[tokio::test]
async fn test_voting_flow_sets_ranked_flag() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = session(store.clone(), "2024-03-05");

    assert_eq!(
        tracker.start_voting(batch("a")).await.unwrap(),
        VotingPhase::Ranking { batch: 1 }
    );
    for (i, item) in batch("a").iter().enumerate() {
        tracker.assign_rank(item, (i + 1) as u8).unwrap();
    }

    let first = tracker.submit_batch(None).await.unwrap();
    assert!(!first.completes_day);
    assert!(!tracker.today_tasks().await.inspire);
    assert!(tracker.record_browse().await.is_err());

    tracker.next_batch(batch("b")).unwrap();
    tracker.assign_rank("b-1", 2).unwrap();
    assert_eq!(
        tracker.assign_rank("b-2", 2),
        Err(RankRejection::RankTaken { rank: 2, holder: "b-1".to_string() })
    );
    tracker.assign_rank("b-2", 1).unwrap();
    tracker.assign_rank("b-3", 3).unwrap();
    tracker.assign_rank("b-4", 4).unwrap();

    let second = tracker
        .submit_batch(Some("2024-03-05T10:00:00Z".to_string()))
        .await
        .unwrap();
    assert!(second.completes_day);
    assert_eq!(second.batch.rankings[0].item_id, "b-2");

    tracker.record_browse().await.unwrap();
    let tasks = tracker.today_tasks().await;
    assert!(tasks.inspire);
    assert!(tasks.connect);

    let raw = store.get("rankings_2024-03-05").await.unwrap().unwrap();
    let stored: Vec<RankingBatch> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 2);
    assert!(store.get("all_rankings").await.unwrap().is_some());
}

#[tokio::test]
async fn test_already_ranked_day_starts_browsing() {
    let store = Arc::new(MemoryStore::with_entries([("ranked_2024-03-05", "true")]));
    let mut tracker = session(store, "2024-03-05");

    let phase = tracker.start_voting(Vec::new()).await.unwrap();
    assert_eq!(phase, VotingPhase::FreeBrowse);
    assert!(tracker.record_browse().await.is_ok());
}

#[tokio::test]
async fn test_incomplete_submit_leaves_store_untouched() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = session(store.clone(), "2024-03-05");
    tracker.start_voting(batch("a")).await.unwrap();
    tracker.assign_rank("a-1", 1).unwrap();

    let err = tracker.submit_batch(None).await.unwrap_err();
    assert!(matches!(err, MagicError::Rank(RankRejection::Incomplete { .. })));
    assert!(store.is_empty().await);
    assert_eq!(tracker.voting().unwrap().rank_of("a-1"), Some(1));
}

#[tokio::test]
async fn test_submit_keeps_undecodable_ranking_history() {
    let store = Arc::new(MemoryStore::with_entries([(
        "all_rankings",
        r#"[{"date":"2024-03-01","batch":1,"rankings":[]},{"date":"2024-03-02","note":"legacy"}]"#,
    )]));
    let mut tracker = session(store.clone(), "2024-03-05");
    tracker.start_voting(batch("a")).await.unwrap();
    rank_in_order(&mut tracker, &batch("a"));
    tracker.submit_batch(None).await.unwrap();

    let raw = store.get("all_rankings").await.unwrap().unwrap();
    let history: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1]["note"], "legacy");
    assert_eq!(history[2]["date"], "2024-03-05");
    assert_eq!(history[2]["batch"], 1);
}

#[tokio::test]
async fn test_submit_refuses_non_array_history() {
    let store = Arc::new(MemoryStore::with_entries([("all_rankings", "{}")]));
    let mut tracker = session(store.clone(), "2024-03-05");
    tracker.start_voting(batch("a")).await.unwrap();
    rank_in_order(&mut tracker, &batch("a"));

    let err = tracker.submit_batch(None).await.unwrap_err();
    assert!(matches!(err, MagicError::Store(_)));
    assert_eq!(store.get("all_rankings").await.unwrap().as_deref(), Some("{}"));
    // The batch stays open for another try
    assert_eq!(
        tracker.voting().unwrap().phase(),
        VotingPhase::Ranking { batch: 1 }
    );
}

#[tokio::test]
async fn test_retry_after_failed_ranked_flag_records_batch_once() {
    let store = Arc::new(FailRankedOnce::default());
    let options = SessionOptions {
        voting: VotingRules { batch_size: 4, batches_required: 1 },
        ..Default::default()
    };
    let mut tracker = TrackerSession::new(store.clone(), d("2024-03-05"), options);
    tracker.start_voting(batch("a")).await.unwrap();
    rank_in_order(&mut tracker, &batch("a"));

    assert!(tracker.submit_batch(None).await.is_err());
    let retried = tracker.submit_batch(None).await.unwrap();
    assert!(retried.completes_day);
    assert_eq!(tracker.voting().unwrap().phase(), VotingPhase::FreeBrowse);

    let day: Vec<RankingBatch> =
        serde_json::from_str(&store.get("rankings_2024-03-05").await.unwrap().unwrap()).unwrap();
    assert_eq!(day.len(), 1);
    let all: Vec<serde_json::Value> =
        serde_json::from_str(&store.get("all_rankings").await.unwrap().unwrap()).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(store.get("ranked_2024-03-05").await.unwrap().as_deref(), Some("true"));
}

#[tokio::test]
async fn test_clear_rank_through_session() {
    let store = Arc::new(MemoryStore::new());
    let mut tracker = session(store, "2024-03-05");
    assert_eq!(tracker.clear_rank("a-1"), Err(RankRejection::NotRanking));

    tracker.start_voting(batch("a")).await.unwrap();
    tracker.assign_rank("a-1", 1).unwrap();
    assert_eq!(tracker.clear_rank("a-1"), Ok(Some(1)));
    tracker.assign_rank("a-2", 1).unwrap();
    assert_eq!(tracker.voting().unwrap().holder_of(1), Some("a-2"));
}

#[tokio::test]
async fn test_calendar_window_and_lifetime_stats() {
    let store = Arc::new(MemoryStore::new());
    let tracker = session(store.clone(), "2024-03-10");
    let recorder = tracker.recorder();

    recorder
        .save_manifest(
            d("2024-02-20"),
            &ManifestEntry { growth_goal: "finish sketchbook".to_string(), ..Default::default() },
        )
        .await
        .unwrap();
    recorder.acknowledge_goal(d("2024-02-20"), true).await.unwrap();
    recorder
        .add_artwork(Visibility::Public, ArtworkRecord::new("2024-03-09"))
        .await
        .unwrap();
    recorder
        .add_artwork(Visibility::Private, ArtworkRecord::new("2024-01-15"))
        .await
        .unwrap();
    recorder.favorite_artwork(ArtworkRecord::new("2024-03-10")).await.unwrap();

    let stats = tracker.calendar().await.unwrap();
    assert_eq!(stats.per_day.len(), 3);
    assert!(stats.day(d("2024-02-20")).unwrap().goal);
    assert!(stats.day(d("2024-03-09")).unwrap().art);
    assert!(stats.day(d("2024-03-10")).unwrap().connect);
    // Outside the window, still an artwork day
    assert!(stats.day(d("2024-01-15")).is_none());

    assert_eq!(stats.goals_set, 1);
    assert_eq!(stats.goals_met, 1);
    assert_eq!(stats.courage_posts, 1);
    // Streak notion: manifest 02-20 and public art 03-09
    assert_eq!(stats.total_active_days, 2);
    assert_eq!(stats.current_streak, 1);
}

#[tokio::test]
async fn test_month_range_aggregate() {
    let store = Arc::new(MemoryStore::with_entries([
        ("ranked_2024-02-28", "true"),
        ("ranked_2024-02-29", "true"),
        ("ranked_2024-03-01", "true"),
    ]));
    let tracker = session(store, "2024-03-01");
    let stats = tracker.aggregate(DateRange::month(2024, 2).unwrap()).await;
    assert_eq!(stats.per_day.len(), 2);
    assert_eq!(stats.longest_streak, 3);
    assert_eq!(stats.inspire_days, 3);
}

#[tokio::test]
async fn test_sqlite_backed_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tracker.db");

    {
        let store: Arc<dyn ActivityStore> = Arc::new(SqliteStore::open(&path).unwrap());
        let tracker = session(store, "2024-03-05");
        tracker.recorder().add_art_time(d("2024-03-05"), 1500).await.unwrap();
        tracker.recorder().mark_email_sent(d("2024-03-05")).await.unwrap();
    }

    let store: Arc<dyn ActivityStore> = Arc::new(SqliteStore::open(&path).unwrap());
    let tracker = session(store, "2024-03-06");
    let tasks = tracker.evaluate_tasks(d("2024-03-05")).await;
    assert!(tasks.art);
    assert!(tasks.connect);
    assert!(!tasks.manifest);
}
