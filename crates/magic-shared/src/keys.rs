//! Store key layout.
//!
//! Per-day keys are `<prefix><YYYY-MM-DD>`. Global keys hold counters or
//! JSON arrays spanning all of history.

use crate::dates::{format_date, parse_date};
use chrono::NaiveDate;

pub const MANIFEST_PREFIX: &str = "manifest_";
pub const ART_TIME_PREFIX: &str = "art_time_";
pub const ART_CREATED_PREFIX: &str = "art_created_";
pub const RANKED_PREFIX: &str = "ranked_";
pub const BROWSED_PREFIX: &str = "browsed_";
pub const EMAIL_SENT_PREFIX: &str = "email_sent_";
pub const GOAL_ACK_PREFIX: &str = "goal_acknowledged_";
pub const RANKINGS_PREFIX: &str = "rankings_";

pub const WEEKLY_ART_TIME: &str = "weekly_art_time";
pub const WEEK_START_DATE: &str = "week_start_date";
pub const PUBLIC_ARTWORKS: &str = "public_artworks";
pub const PRIVATE_ARTWORKS: &str = "private_artworks";
pub const FAVORITE_ARTWORKS: &str = "favorite_artworks";
pub const ALL_RANKINGS: &str = "all_rankings";
pub const CHALLENGE_DATE: &str = "challenge_date";
pub const TODAYS_CHALLENGE: &str = "todays_challenge";

/// Flag value for boolean day flags
pub const FLAG_TRUE: &str = "true";
/// Goal acknowledgment values
pub const ACK_YES: &str = "yes";
pub const ACK_NO: &str = "no";

/// Per-day key kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKey {
    Manifest,
    ArtTime,
    ArtCreated,
    Ranked,
    Browsed,
    EmailSent,
    GoalAcknowledged,
    Rankings,
}

impl DayKey {
    pub fn prefix(&self) -> &'static str {
        match self {
            DayKey::Manifest => MANIFEST_PREFIX,
            DayKey::ArtTime => ART_TIME_PREFIX,
            DayKey::ArtCreated => ART_CREATED_PREFIX,
            DayKey::Ranked => RANKED_PREFIX,
            DayKey::Browsed => BROWSED_PREFIX,
            DayKey::EmailSent => EMAIL_SENT_PREFIX,
            DayKey::GoalAcknowledged => GOAL_ACK_PREFIX,
            DayKey::Rankings => RANKINGS_PREFIX,
        }
    }

    /// Full store key for a date
    pub fn for_date(&self, date: NaiveDate) -> String {
        format!("{}{}", self.prefix(), format_date(date))
    }

    /// Extract the date from a key of this kind; `None` for other keys, bad
    /// dates, or suffixes that `for_date` would not produce
    pub fn date_of(&self, key: &str) -> Option<NaiveDate> {
        let rest = key.strip_prefix(self.prefix())?;
        let date = parse_date(rest).ok()?;
        (format_date(date) == rest).then_some(date)
    }
}
