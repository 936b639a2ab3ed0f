//! Error types for the MAGIC tracker core.

use crate::voting::RankRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MagicError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    #[error("Voting error: {0}")]
    Voting(String),

    #[error("Rank rejected: {0}")]
    Rank(#[from] RankRejection),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MagicError {
    /// Short machine-readable kind for `--json` error reports
    pub fn kind(&self) -> &'static str {
        match self {
            MagicError::Store(_) => "store",
            MagicError::InvalidDate(_) => "invalid_date",
            MagicError::InvalidRange { .. } => "invalid_range",
            MagicError::Voting(_) => "voting",
            MagicError::Rank(_) => "rank_rejected",
            MagicError::Io(_) => "io",
            MagicError::Json(_) => "json",
            MagicError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, MagicError>;
