//! Due-date status helpers.
//!
//! Everything here works on whole calendar days. `DateStatus` carries the
//! reference day explicitly so callers decide what "today" means.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateStatus {
    today: NaiveDate,
}

/// One column of the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub date: String,
    pub label: String,
    pub full_label: String,
    pub day_number: u32,
    pub is_today: bool,
}

impl DateStatus {
    pub fn on(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Reference day taken from the local clock.
    pub fn today() -> Self {
        Self::on(Local::now().date_naive())
    }

    /// Due today is never overdue.
    pub fn is_overdue(&self, due: NaiveDate) -> bool {
        due < self.today
    }

    /// Signed whole-day distance: 0 for today, negative once past.
    pub fn days_until_due(&self, due: NaiveDate) -> i64 {
        (due - self.today).num_days()
    }

    /// Sunday-start calendar week containing the reference day.
    pub fn is_this_week(&self, date: NaiveDate) -> bool {
        let start = week_start(self.today);
        date >= start && (date - start).num_days() < 7
    }

    pub fn label(&self, date: NaiveDate) -> String {
        match self.days_until_due(date) {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            _ if self.is_this_week(date) => date.format("%A").to_string(),
            _ => format_date(date),
        }
    }

    pub fn week_days(&self) -> Vec<WeekDay> {
        let start = week_start(self.today);
        start
            .iter_days()
            .take(7)
            .map(|date| WeekDay {
                date: date.format("%Y-%m-%d").to_string(),
                label: date.format("%a").to_string(),
                full_label: date.format("%A").to_string(),
                day_number: date.day(),
                is_today: date == self.today,
            })
            .collect()
    }

    /// Sunday = 0 .. Saturday = 6, the numbering the schedule uses.
    pub fn weekday_index(&self) -> u8 {
        self.today.weekday().num_days_from_sunday() as u8
    }
}

pub fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its date part is kept).
pub fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| AppError::InvalidDate(input.to_string()))
}

/// Accepts `HH:MM` or `HH:MM:SS` on a 24h clock.
pub fn parse_time(input: &str) -> Result<NaiveTime, AppError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| AppError::InvalidDate(input.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// `"14:30"` becomes `"2:30 PM"`.
pub fn format_time(input: &str) -> Result<String, AppError> {
    parse_time(input).map(|time| time.format("%-I:%M %p").to_string())
}

pub(crate) mod serde_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(D::Error::custom)
    }
}
