//! Shared types and pure logic for the MAGIC tracker.
//!
//! Nothing here touches the store or the clock: every date-dependent
//! function takes `today` explicitly.

pub mod dates;
pub mod entries;
pub mod error;
pub mod keys;
pub mod rewards;
pub mod stats;
pub mod streaks;
pub mod tasks;
pub mod voting;

pub use dates::DateRange;
pub use entries::{ArtworkRecord, ManifestEntry, RankEntry, RankingBatch, RankingRecord, Visibility};
pub use error::MagicError;
pub use keys::DayKey;
pub use rewards::{decompose, RewardUnits, StreakState};
pub use stats::RangeStats;
pub use streaks::StreakStats;
pub use tasks::{Task, TaskSet};
pub use voting::{RankRejection, VotingPhase, VotingRules, VotingSession};
