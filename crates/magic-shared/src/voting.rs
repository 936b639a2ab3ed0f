//! Ranking session state machine feeding the Inspire task.
//!
//! A day's voting is a sequence of fixed-size batches. Each item in a batch
//! gets a unique rank `1..=batch_size`; a batch can only be submitted once
//! every item is ranked. Submitting the last required batch completes the
//! day's voting and unlocks free browsing.
//!
//! Only the terminal "ranked" outcome is durable. Assignments for the open
//! batch live here, in memory, and are dropped when the next batch begins.

use crate::entries::{RankEntry, RankingBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: usize = 4;
pub const DEFAULT_BATCHES_REQUIRED: u32 = 2;

/// Validation rejections. None of them mutate the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankRejection {
    #[error("Item '{0}' is not in the current batch")]
    UnknownItem(String),

    #[error("Rank {rank} is out of range 1..={max}")]
    OutOfRange { rank: u8, max: usize },

    #[error("Rank {rank} is already held by '{holder}'")]
    RankTaken { rank: u8, holder: String },

    #[error("Only {ranked} of {total} items are ranked")]
    Incomplete { ranked: usize, total: usize },

    #[error("Batch needs {expected} distinct items, got {got}")]
    InvalidBatch { expected: usize, got: usize },

    #[error("No batch is open for ranking")]
    NotRanking,

    #[error("The previous batch has not been submitted")]
    BatchStillOpen,
}

/// Fixed rules for one voting day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRules {
    pub batch_size: usize,
    pub batches_required: u32,
}

impl Default for VotingRules {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batches_required: DEFAULT_BATCHES_REQUIRED,
        }
    }
}

/// Where the day's voting stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum VotingPhase {
    /// Batch `batch` (1-based) is open for rank assignment
    Ranking { batch: u32 },
    /// Batch `batch` was submitted and the next one has not started
    BatchSubmitted { batch: u32 },
    /// All required batches submitted; the day counts as ranked
    FreeBrowse,
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedBatch {
    pub batch: RankingBatch,
    /// This submission completed the day's voting
    pub completes_day: bool,
}

/// In-memory ranking session
#[derive(Debug, Clone)]
pub struct VotingSession {
    rules: VotingRules,
    phase: VotingPhase,
    items: Vec<String>,
    ranks: BTreeMap<String, u8>,
}

impl VotingSession {
    /// Open the first batch
    pub fn new(rules: VotingRules, items: Vec<String>) -> Result<Self, RankRejection> {
        check_batch(&rules, &items)?;
        Ok(Self {
            rules,
            phase: VotingPhase::Ranking { batch: 1 },
            items,
            ranks: BTreeMap::new(),
        })
    }

    /// Session for a day that is already ranked
    pub fn completed(rules: VotingRules) -> Self {
        Self {
            rules,
            phase: VotingPhase::FreeBrowse,
            items: Vec::new(),
            ranks: BTreeMap::new(),
        }
    }

    pub fn rules(&self) -> VotingRules {
        self.rules
    }

    pub fn phase(&self) -> VotingPhase {
        self.phase
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn can_browse(&self) -> bool {
        self.phase == VotingPhase::FreeBrowse
    }

    pub fn rank_of(&self, item: &str) -> Option<u8> {
        self.ranks.get(item).copied()
    }

    /// Item currently holding `rank`
    pub fn holder_of(&self, rank: u8) -> Option<&str> {
        self.ranks
            .iter()
            .find(|(_, r)| **r == rank)
            .map(|(item, _)| item.as_str())
    }

    /// Every item in the open batch has a rank
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.ranks.len() == self.items.len()
    }

    /// Assign `rank` to `item`. Moving an item to a free rank releases its old one.
    pub fn assign_rank(&mut self, item: &str, rank: u8) -> Result<(), RankRejection> {
        if !matches!(self.phase, VotingPhase::Ranking { .. }) {
            return Err(RankRejection::NotRanking);
        }
        if !self.items.iter().any(|i| i == item) {
            return Err(RankRejection::UnknownItem(item.to_string()));
        }
        if rank == 0 || rank as usize > self.rules.batch_size {
            return Err(RankRejection::OutOfRange {
                rank,
                max: self.rules.batch_size,
            });
        }
        if let Some(holder) = self.holder_of(rank) {
            if holder != item {
                return Err(RankRejection::RankTaken {
                    rank,
                    holder: holder.to_string(),
                });
            }
            return Ok(());
        }
        self.ranks.insert(item.to_string(), rank);
        Ok(())
    }

    /// Release an item's rank; returns the rank it held
    pub fn clear_rank(&mut self, item: &str) -> Result<Option<u8>, RankRejection> {
        if !matches!(self.phase, VotingPhase::Ranking { .. }) {
            return Err(RankRejection::NotRanking);
        }
        Ok(self.ranks.remove(item))
    }

    /// Submit the open batch
    pub fn submit(&mut self) -> Result<SubmittedBatch, RankRejection> {
        let batch = match self.phase {
            VotingPhase::Ranking { batch } => batch,
            _ => return Err(RankRejection::NotRanking),
        };
        if !self.is_complete() {
            return Err(RankRejection::Incomplete {
                ranked: self.ranks.len(),
                total: self.items.len(),
            });
        }

        let mut rankings: Vec<RankEntry> = self
            .ranks
            .iter()
            .map(|(item, rank)| RankEntry {
                item_id: item.clone(),
                rank: *rank,
            })
            .collect();
        rankings.sort_by_key(|e| e.rank);

        let completes_day = batch >= self.rules.batches_required;
        self.phase = if completes_day {
            VotingPhase::FreeBrowse
        } else {
            VotingPhase::BatchSubmitted { batch }
        };
        self.items.clear();
        self.ranks.clear();

        Ok(SubmittedBatch {
            batch: RankingBatch {
                batch,
                rankings,
                submitted_at: None,
            },
            completes_day,
        })
    }

    /// Open the next batch after a submission
    pub fn begin_batch(&mut self, items: Vec<String>) -> Result<(), RankRejection> {
        let next = match self.phase {
            VotingPhase::BatchSubmitted { batch } => batch + 1,
            VotingPhase::Ranking { .. } => return Err(RankRejection::BatchStillOpen),
            VotingPhase::FreeBrowse => return Err(RankRejection::NotRanking),
        };
        check_batch(&self.rules, &items)?;
        self.items = items;
        self.ranks.clear();
        self.phase = VotingPhase::Ranking { batch: next };
        Ok(())
    }
}

fn check_batch(rules: &VotingRules, items: &[String]) -> Result<(), RankRejection> {
    let mut distinct: Vec<&String> = items.iter().collect();
    distinct.sort();
    distinct.dedup();
    if items.len() != rules.batch_size || distinct.len() != items.len() {
        return Err(RankRejection::InvalidBatch {
            expected: rules.batch_size,
            got: distinct.len(),
        });
    }
    Ok(())
}
