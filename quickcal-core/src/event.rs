//! Parsed event records.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::alert::AlertOffset;

/// Calendar date plus an optional time of day.
///
/// `hour == 0` doubles as "no time given", so midnight cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// The date with all time fields zero.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day(), 0, 0, 0)
    }

    pub fn has_time(&self) -> bool {
        self.hour > 0
    }

    /// `M/D/YYYY`, no padding.
    pub fn date_string(&self) -> String {
        format!("{}/{}/{}", self.month, self.day, self.year)
    }

    pub fn time_string(&self) -> String {
        if self.has_time() {
            format!("{}:{:02}", self.hour, self.minute)
        } else {
            "All day".to_string()
        }
    }

    /// Start timestamp, or `None` when the fields do not name a real moment.
    ///
    /// Hour 24 is the one out-of-range value accepted ("12pm" parses to it) and
    /// lands on the next day. Any larger hour, or a minute/second past 59, is
    /// rejected rather than carried into the next hour or day.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        if self.hour > 24 || self.minute > 59 || self.second > 59 {
            return None;
        }
        let midnight =
            NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(0, 0, 0)?;
        midnight.checked_add_signed(
            Duration::hours(i64::from(self.hour))
                + Duration::minutes(i64::from(self.minute))
                + Duration::seconds(i64::from(self.second)),
        )
    }
}

/// Structured result of parsing one event sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub title: String,
    pub date: CalendarDate,
    /// At most one entry: only the first alert of a list is kept.
    pub alerts: Vec<AlertOffset>,
    pub calendar_name: Option<String>,
    pub location: Option<String>,
    pub is_all_day: bool,
}

impl ParsedEvent {
    pub fn new(
        title: String,
        date: CalendarDate,
        alerts: Vec<AlertOffset>,
        calendar_name: Option<String>,
    ) -> Self {
        let mut alerts = alerts;
        alerts.truncate(1);
        Self {
            title,
            is_all_day: !date.has_time(),
            date,
            alerts,
            calendar_name,
            location: None,
        }
    }

    pub fn alert(&self) -> Option<&AlertOffset> {
        self.alerts.first()
    }
}

impl fmt::Display for ParsedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Event Title: {}", self.title)?;
        writeln!(f, "Date: {}", self.date.date_string())?;
        writeln!(f, "Time: {}", self.date.time_string())?;
        writeln!(f, "In Calendar: {}", self.calendar_name.as_deref().unwrap_or("none"))?;
        if let Some(location) = &self.location {
            writeln!(f, "Location: {location}")?;
        }
        match self.alert() {
            Some(alert) => writeln!(f, "Alert: {alert}"),
            None => writeln!(f, "Alert: none"),
        }
    }
}
