//! MAGIC tracker core over the activity store.
//!
//! Reads go through the resilient `StoreReader`; evaluation, streaks and
//! aggregation are read-only. `TrackerSession` ties them to an explicit
//! `today` and holds the day's voting state.

pub mod aggregator;
pub mod config;
pub mod evaluator;
pub mod reader;
pub mod recorder;
pub mod session;
pub mod sqlite_store;
pub mod store;
pub mod streak;

pub use config::MagicConfig;
pub use evaluator::{evaluate_tasks, TaskEvaluator};
pub use reader::StoreReader;
pub use recorder::{daily_prompt, ActivityRecorder};
pub use session::{SessionOptions, TrackerSession};
pub use sqlite_store::SqliteStore;
pub use store::{ActivityStore, MemoryStore};
