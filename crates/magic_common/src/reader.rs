//! Typed read boundary over the activity store.
//!
//! Everything the evaluators see has already been decoded into schema types.
//! A failed read or a malformed value is logged and treated as absent, so a
//! corrupted record can only ever turn a task off.

use crate::store::ActivityStore;
use chrono::NaiveDate;
use magic_shared::dates::parse_date;
use magic_shared::entries::{ArtworkRecord, ManifestEntry};
use magic_shared::keys::{DayKey, FLAG_TRUE};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use tracing::warn;

/// Resilient typed reader
#[derive(Clone, Copy)]
pub struct StoreReader<'a> {
    store: &'a dyn ActivityStore,
}

impl<'a> StoreReader<'a> {
    pub fn new(store: &'a dyn ActivityStore) -> Self {
        Self { store }
    }

    /// Raw value; read errors become `None`
    pub async fn raw(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Store read failed for '{}': {}", key, e);
                None
            }
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.raw(key).await.is_some()
    }

    /// `"true"` flag
    pub async fn flag(&self, key: &str) -> bool {
        self.raw(key).await.as_deref() == Some(FLAG_TRUE)
    }

    /// Non-negative integer counter; absent or malformed is 0
    pub async fn counter(&self, key: &str) -> u64 {
        let Some(raw) = self.raw(key).await else {
            return 0;
        };
        match raw.trim().parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                warn!("Ignoring malformed counter '{}': {:?}", key, raw);
                0
            }
        }
    }

    /// Date value; absent or malformed is `None`
    pub async fn date(&self, key: &str) -> Option<NaiveDate> {
        let raw = self.raw(key).await?;
        match parse_date(&raw) {
            Ok(date) => Some(date),
            Err(_) => {
                warn!("Ignoring malformed date '{}': {:?}", key, raw);
                None
            }
        }
    }

    /// JSON value; absent or malformed is `None`
    pub async fn json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring malformed JSON in '{}': {}", key, e);
                None
            }
        }
    }

    /// Manifest entry for a day
    pub async fn manifest(&self, date: NaiveDate) -> Option<ManifestEntry> {
        self.json(&DayKey::Manifest.for_date(date)).await
    }

    /// Artwork list; a bad element is skipped, a bad list is empty
    pub async fn artworks(&self, key: &str) -> Vec<ArtworkRecord> {
        let Some(values) = self.json::<Vec<serde_json::Value>>(key).await else {
            return Vec::new();
        };
        values
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<ArtworkRecord>(v) {
                Ok(art) => Some(art),
                Err(e) => {
                    warn!("Skipping malformed artwork in '{}': {}", key, e);
                    None
                }
            })
            .collect()
    }

    /// Dates of the artworks under `key`; unparseable dates are dropped
    pub async fn artwork_dates(&self, key: &str) -> BTreeSet<NaiveDate> {
        self.artworks(key)
            .await
            .iter()
            .filter_map(|art| parse_date(&art.date).ok())
            .collect()
    }

    /// Keys with `prefix`; a failed scan is empty
    pub async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        match self.store.keys_with_prefix(prefix).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Key scan failed for '{}': {}", prefix, e);
                Vec::new()
            }
        }
    }

    /// Dates that have a key of kind `kind`
    pub async fn dates_with(&self, kind: DayKey) -> BTreeSet<NaiveDate> {
        self.keys_with_prefix(kind.prefix())
            .await
            .iter()
            .filter_map(|k| kind.date_of(k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use magic_shared::keys::PUBLIC_ARTWORKS;

    #[tokio::test]
    async fn test_malformed_values_degrade() {
        let store = MemoryStore::with_entries([
            ("weekly_art_time", "abc"),
            ("manifest_2024-03-01", "{not json"),
            ("week_start_date", "monday"),
        ]);
        let reader = StoreReader::new(&store);
        let day = parse_date("2024-03-01").unwrap();

        assert_eq!(reader.counter("weekly_art_time").await, 0);
        assert!(reader.manifest(day).await.is_none());
        assert!(reader.date("week_start_date").await.is_none());
        assert!(reader.contains("manifest_2024-03-01").await);
    }

    #[tokio::test]
    async fn test_artworks_skip_bad_elements() {
        let store = MemoryStore::with_entries([(
            PUBLIC_ARTWORKS,
            r#"[{"date":"2024-03-01"},{"date":42},{"date":"03/02/2024"},{"date":"2024-03-04","title":"Sky"}]"#,
        )]);
        let reader = StoreReader::new(&store);

        assert_eq!(reader.artworks(PUBLIC_ARTWORKS).await.len(), 3);
        let dates = reader.artwork_dates(PUBLIC_ARTWORKS).await;
        assert_eq!(dates.len(), 2);
    }

    #[tokio::test]
    async fn test_dates_with_skips_foreign_keys() {
        let store = MemoryStore::with_entries([
            ("ranked_2024-03-01", "true"),
            ("ranked_oops", "true"),
            ("rankings_2024-03-02", "[]"),
        ]);
        let reader = StoreReader::new(&store);
        let dates = reader.dates_with(DayKey::Ranked).await;
        assert_eq!(dates.into_iter().collect::<Vec<_>>(), vec![parse_date("2024-03-01").unwrap()]);
    }
}
