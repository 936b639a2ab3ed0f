//! Schema types for stored records.
//!
//! Every field is defaulted so partially written records still decode.
//! Records that fail to decode at all are handled by the store reader.

use serde::{Deserialize, Serialize};

/// A day's journaling entry, stored under `manifest_<date>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestEntry {
    pub call_muse: String,
    pub dump_stalls: String,
    pub manifest_vision: String,
    pub growth_goal: String,
    /// RFC 3339 timestamp of the last save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl ManifestEntry {
    /// At least one free-text journaling field is non-empty after trimming
    pub fn has_journal_text(&self) -> bool {
        [&self.call_muse, &self.dump_stalls, &self.manifest_vision]
            .iter()
            .any(|field| !field.trim().is_empty())
    }

    /// The growth goal is non-empty after trimming
    pub fn has_goal(&self) -> bool {
        !self.growth_goal.trim().is_empty()
    }
}

/// Where an artwork was posted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// An uploaded or saved artwork. Only `date` matters to the tracker core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtworkRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// ISO `YYYY-MM-DD`; kept as a string so foreign formats never fail the whole list
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl ArtworkRecord {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// One item's rank inside a submitted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub item_id: String,
    pub rank: u8,
}

/// A submitted ranking batch, stored in `rankings_<date>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingBatch {
    /// 1-based batch number within the day
    pub batch: u32,
    pub rankings: Vec<RankEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// History entry in `all_rankings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRecord {
    pub date: String,
    #[serde(flatten)]
    pub batch: RankingBatch,
}
