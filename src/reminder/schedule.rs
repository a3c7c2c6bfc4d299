use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::design::model::{BgPreset, DesignState, Occasion};
use crate::foundation::color::{Rgba8, de_opt_hex_lenient};

/// Name stored on a reminder when the design has no recipient.
pub const DEFAULT_REMINDER_NAME: &str = "Someone";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// A saved recurring reminder. Created once, never mutated, removed only by clearing the list.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRecord {
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub occasion: Occasion,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Source date; only month and day matter for recurrence.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub next: Option<NaiveDateTime>,
    #[serde(default)]
    pub bg_preset: BgPreset,
    #[serde(default, deserialize_with = "de_opt_hex_lenient")]
    pub bg_color: Option<Rgba8>,
    /// Flattened image snapshot as a `data:image/png;base64,...` URI.
    #[serde(default)]
    pub image: Option<String>,
}

impl ReminderRecord {
    pub fn from_design(
        design: &DesignState,
        id: i64,
        now: NaiveDateTime,
        image: Option<String>,
    ) -> Self {
        let name = if design.recipient.is_empty() {
            DEFAULT_REMINDER_NAME.to_string()
        } else {
            design.recipient.clone()
        };
        Self {
            id,
            name,
            occasion: design.occasion,
            title: design.title.clone(),
            message: design.message.clone(),
            date: design.event_date,
            next: design
                .event_date
                .map(|d| compute_next_occurrence(d, now)),
            bg_preset: design.bg_preset,
            bg_color: design.bg_color,
            image,
        }
    }
}

/// Midnight of `(year, month, day)`, overflowing out-of-range days into the next month
/// (Feb 29 in a non-leap year becomes Mar 1).
fn lenient_midnight(year: i32, month: u32, day: u32) -> Option<NaiveDateTime> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_days(Days::new(u64::from(day.saturating_sub(1))))?;
    Some(date.and_time(NaiveTime::MIN))
}

/// Next anniversary of `date` (month/day) at local midnight, no earlier than `now`.
///
/// Today's date counts only when `now` is exactly midnight.
pub fn compute_next_occurrence(date: NaiveDate, now: NaiveDateTime) -> NaiveDateTime {
    let (month, day) = (date.month(), date.day());
    let fallback = date.and_time(NaiveTime::MIN);
    match lenient_midnight(now.year(), month, day) {
        Some(candidate) if candidate >= now => candidate,
        _ => lenient_midnight(now.year() + 1, month, day).unwrap_or(fallback),
    }
}

/// Whole days until `next`, rounded up.
pub fn days_remaining(next: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let ms = (next - now).num_milliseconds();
    -(-ms).div_euclid(DAY_MS)
}

/// A reminder paired with its countdown relative to some `now`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Upcoming<'a> {
    pub record: &'a ReminderRecord,
    pub days_remaining: Option<i64>,
}

/// Sort reminders by next occurrence, soonest first.
///
/// Records without a next occurrence sort as the Unix epoch, i.e. before everything else. The
/// sort is stable, so ties keep their saved order.
pub fn rank_upcoming(records: &[ReminderRecord], now: NaiveDateTime) -> Vec<Upcoming<'_>> {
    let epoch = chrono::DateTime::UNIX_EPOCH.naive_utc();
    let mut ranked: Vec<Upcoming<'_>> = records
        .iter()
        .map(|record| Upcoming {
            record,
            days_remaining: record.next.map(|next| days_remaining(next, now)),
        })
        .collect();
    ranked.sort_by_key(|u| u.record.next.unwrap_or(epoch));
    ranked
}

/// Display row for the upcoming-reminders list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderView {
    pub name: String,
    pub occasion: String,
    pub caption: String,
    pub countdown: String,
}

impl From<&Upcoming<'_>> for ReminderView {
    fn from(u: &Upcoming<'_>) -> Self {
        let r = u.record;
        let caption = if r.title.is_empty() {
            r.message.clone()
        } else {
            r.title.clone()
        };
        Self {
            name: r.name.clone(),
            occasion: capitalize(r.occasion.as_str()),
            caption,
            countdown: match u.days_remaining {
                Some(n) => format!("{n}d"),
                None => "—".to_string(),
            },
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reminder/schedule.rs"]
mod tests;
