use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotesError;

/// Maximum length of an event title, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum length of a folder name, in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 50;

/// Icon assigned to folders created without one.
pub const DEFAULT_FOLDER_ICON: &str = "📁";

/// One meeting record with schedule metadata, transcript, and derived
/// summary/key points.
///
/// Field names serialize in camelCase; this is both the persisted layout and
/// the wire layout. `folder_ids` holds soft references: ids of deleted
/// folders are removed by the cascade, and any that slip through are
/// filtered at read time rather than treated as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Timestamp-derived unique id, immutable after creation
    pub id: i64,

    pub title: String,

    pub location: String,

    pub date: DateTime<Utc>,

    /// Transcript segments joined by the triple-newline delimiter
    #[serde(default)]
    pub transcription: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub key_points: Vec<String>,

    #[serde(default)]
    pub folder_ids: Vec<i64>,
}

/// A named, emoji-tagged tag used to group events (many-to-many).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    pub icon: String,
}

/// User input for creating an event. Validated by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub location: String,
    pub date: DateTime<Utc>,
}

/// Time-window filter for event listings.
///
/// `Today` compares by calendar day; `Week` and `Month` compare the raw
/// date-time value. The asymmetry is deliberate and load-bearing: an event
/// this evening is in today's view even after it has passed, while the month
/// window's upper bound is the last calendar day at midnight, so an event
/// later that day falls outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Today,
    Week,
    Month,
}

impl TimeWindow {
    /// Whether `date` falls in this window relative to `now`, both in local
    /// wall-clock time.
    pub fn contains(&self, date: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            TimeWindow::Today => date.date() == now.date(),
            TimeWindow::Week => {
                let start = now.date().and_time(NaiveTime::MIN);
                let end = start + Duration::days(7);
                date >= start && date < end
            }
            TimeWindow::Month => {
                let first = first_of_month(now.date()).and_time(NaiveTime::MIN);
                let last = last_of_month(now.date()).and_time(NaiveTime::MIN);
                date >= first && date <= last
            }
        }
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(TimeWindow::Today),
            "week" => Ok(TimeWindow::Week),
            "month" => Ok(TimeWindow::Month),
            other => Err(NotesError::Validation(format!(
                "unknown view '{other}' (expected today, week, or month)"
            ))),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    first_of_next.and_then(|d| d.pred_opt()).unwrap_or(date)
}
