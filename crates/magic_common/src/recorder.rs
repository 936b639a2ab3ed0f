//! Write paths for user activity.
//!
//! These are the mutations the app performs from its screens. Unlike reads,
//! write failures are returned to the caller.

use crate::reader::StoreReader;
use crate::store::ActivityStore;
use chrono::NaiveDate;
use magic_shared::dates::{day_of_year, format_date, week_start};
use magic_shared::entries::{ArtworkRecord, ManifestEntry, Visibility};
use magic_shared::error::{MagicError, Result};
use magic_shared::keys::{
    DayKey, ACK_NO, ACK_YES, CHALLENGE_DATE, FAVORITE_ARTWORKS, FLAG_TRUE, PRIVATE_ARTWORKS,
    PUBLIC_ARTWORKS, TODAYS_CHALLENGE, WEEKLY_ART_TIME, WEEK_START_DATE,
};
use serde_json::Value;
use tracing::{info, warn};

/// Records activity into the store
#[derive(Clone, Copy)]
pub struct ActivityRecorder<'a> {
    store: &'a dyn ActivityStore,
}

impl<'a> ActivityRecorder<'a> {
    pub fn new(store: &'a dyn ActivityStore) -> Self {
        Self { store }
    }

    fn reader(&self) -> StoreReader<'a> {
        StoreReader::new(self.store)
    }

    /// Save (or overwrite) the day's manifest entry
    pub async fn save_manifest(&self, date: NaiveDate, entry: &ManifestEntry) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        self.store.set(&DayKey::Manifest.for_date(date), &json).await?;
        info!("Saved manifest entry for {}", date);
        Ok(())
    }

    /// Add art time; resets the weekly counter when a new week has started.
    /// Returns the weekly total.
    pub async fn add_art_time(&self, today: NaiveDate, seconds: u64) -> Result<u64> {
        let reader = self.reader();
        let current_week = week_start(today);

        let weekly = if reader.date(WEEK_START_DATE).await == Some(current_week) {
            reader.counter(WEEKLY_ART_TIME).await
        } else {
            info!("New art week starting {}, resetting weekly timer", current_week);
            self.store
                .set(WEEK_START_DATE, &format_date(current_week))
                .await?;
            0
        };
        let weekly = weekly.saturating_add(seconds);
        self.store.set(WEEKLY_ART_TIME, &weekly.to_string()).await?;

        let day_key = DayKey::ArtTime.for_date(today);
        let daily = reader.counter(&day_key).await.saturating_add(seconds);
        self.store.set(&day_key, &daily.to_string()).await?;

        Ok(weekly)
    }

    /// Clear the weekly timer for the current week
    pub async fn reset_weekly_art_time(&self, today: NaiveDate) -> Result<()> {
        self.store
            .set(WEEK_START_DATE, &format_date(week_start(today)))
            .await?;
        self.store.set(WEEKLY_ART_TIME, "0").await
    }

    pub async fn mark_art_created(&self, date: NaiveDate) -> Result<()> {
        self.store
            .set(&DayKey::ArtCreated.for_date(date), FLAG_TRUE)
            .await
    }

    pub async fn mark_email_sent(&self, date: NaiveDate) -> Result<()> {
        self.store
            .set(&DayKey::EmailSent.for_date(date), FLAG_TRUE)
            .await
    }

    /// Record whether the day's goal was met
    pub async fn acknowledge_goal(&self, date: NaiveDate, met: bool) -> Result<()> {
        let value = if met { ACK_YES } else { ACK_NO };
        self.store
            .set(&DayKey::GoalAcknowledged.for_date(date), value)
            .await
    }

    /// Append an artwork to the public or private list
    pub async fn add_artwork(&self, visibility: Visibility, artwork: ArtworkRecord) -> Result<()> {
        let key = match visibility {
            Visibility::Public => PUBLIC_ARTWORKS,
            Visibility::Private => PRIVATE_ARTWORKS,
        };
        self.append_artwork(key, artwork.with_visibility(visibility)).await
    }

    /// Save an artwork to the inspiration collection
    pub async fn favorite_artwork(&self, artwork: ArtworkRecord) -> Result<()> {
        self.append_artwork(FAVORITE_ARTWORKS, artwork).await
    }

    async fn append_artwork(&self, key: &str, artwork: ArtworkRecord) -> Result<()> {
        self.append_to_list(key, serde_json::to_value(&artwork)?, |_| false)
            .await
            .map(|_| ())
    }

    /// Append `value` to the JSON array under `key`.
    ///
    /// Existing elements are written back verbatim, including ones the
    /// schema types cannot decode. A value that is not an array is left
    /// alone and the write fails. Nothing is written when an element already
    /// matches `is_present`; returns whether the value was appended.
    pub(crate) async fn append_to_list<F>(&self, key: &str, value: Value, is_present: F) -> Result<bool>
    where
        F: Fn(&Value) -> bool,
    {
        let mut list = match self.store.get(key).await? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(list)) => list,
                _ => {
                    return Err(MagicError::Store(format!(
                        "'{}' does not hold a JSON array, refusing to overwrite it",
                        key
                    )))
                }
            },
        };
        if list.iter().any(is_present) {
            warn!("Value already recorded in '{}', not appending", key);
            return Ok(false);
        }
        list.push(value);
        self.store.set(key, &serde_json::to_string(&list)?).await?;
        Ok(true)
    }

    /// The day's art challenge. Once picked it is saved, so the day keeps
    /// the same challenge even if `prompts` changes later.
    pub async fn todays_challenge(&self, today: NaiveDate, prompts: &[String]) -> Result<Option<String>> {
        let reader = self.reader();
        if reader.date(CHALLENGE_DATE).await == Some(today) {
            if let Some(saved) = reader.raw(TODAYS_CHALLENGE).await.filter(|c| !c.is_empty()) {
                return Ok(Some(saved));
            }
        }

        let Some(challenge) = daily_prompt(prompts, today) else {
            return Ok(None);
        };
        self.store.set(CHALLENGE_DATE, &format_date(today)).await?;
        self.store.set(TODAYS_CHALLENGE, challenge).await?;
        info!("New art challenge for {}", today);
        Ok(Some(challenge.to_string()))
    }

    /// All manifest entries, newest first
    pub async fn past_manifest_entries(&self) -> Vec<(NaiveDate, ManifestEntry)> {
        let reader = self.reader();
        let mut entries = Vec::new();
        for key in reader.keys_with_prefix(DayKey::Manifest.prefix()).await {
            let Some(date) = DayKey::Manifest.date_of(&key) else {
                warn!("Skipping manifest key with bad date: {}", key);
                continue;
            };
            if let Some(entry) = reader.json::<ManifestEntry>(&key).await {
                entries.push((date, entry));
            }
        }
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries
    }
}

/// The day's art challenge: prompts rotate by day of year
pub fn daily_prompt(prompts: &[String], date: NaiveDate) -> Option<&str> {
    if prompts.is_empty() {
        return None;
    }
    let index = day_of_year(date) as usize % prompts.len();
    prompts.get(index).map(String::as_str)
}
