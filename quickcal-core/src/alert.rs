//! Reminder clause parsing: "... alert 15 minutes before".

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl AlertUnit {
    /// Look up one of the eight accepted tokens. Matching is exact: "Days" is not "days".
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "minute" | "minutes" => Some(AlertUnit::Minute),
            "hour" | "hours" => Some(AlertUnit::Hour),
            "day" | "days" => Some(AlertUnit::Day),
            "week" | "weeks" => Some(AlertUnit::Week),
            _ => None,
        }
    }

    pub fn minutes(self) -> i64 {
        match self {
            AlertUnit::Minute => 1,
            AlertUnit::Hour => 60,
            AlertUnit::Day => 1440,
            AlertUnit::Week => 10080,
        }
    }

    fn name(self) -> &'static str {
        match self {
            AlertUnit::Minute => "minute",
            AlertUnit::Hour => "hour",
            AlertUnit::Day => "day",
            AlertUnit::Week => "week",
        }
    }
}

/// A single reminder, `magnitude` units before the event start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertOffset {
    pub magnitude: u32,
    pub unit: AlertUnit,
}

impl AlertOffset {
    pub fn new(magnitude: u32, unit: AlertUnit) -> Self {
        Self { magnitude, unit }
    }

    pub fn minutes_before(&self) -> i64 {
        i64::from(self.magnitude) * self.unit.minutes()
    }
}

impl fmt::Display for AlertOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.magnitude == 1 { "" } else { "s" };
        write!(f, "{} {}{} before", self.magnitude, self.unit.name(), plural)
    }
}

/// Pull an "alert <list> before" clause off the text.
///
/// Returns every alert in the comma-separated list together with the text that
/// preceded the clause. Anything after the last "before" belongs to the clause
/// and is dropped. Without a clause the text comes back unchanged.
pub fn parse_alerts(text: &str) -> Result<(Vec<AlertOffset>, String)> {
    let list_re = Regex::new(r"^(.*) alert (.* before).*$")?;
    let alert_re = Regex::new(r"^\W*(.+) (.+) before.*$")?;

    let Some(caps) = list_re.captures(text) else {
        tracing::trace!("no alert clause");
        return Ok((Vec::new(), text.to_string()));
    };

    let head = caps[1].to_string();
    let mut alerts = Vec::new();

    for chunk in caps[2].split(',') {
        let malformed = || ParseError::MalformedAlertList {
            chunk: chunk.trim().to_string(),
        };

        let parts = alert_re.captures(chunk).ok_or_else(malformed)?;
        let magnitude: u32 = parts[1].trim().parse().map_err(|_| malformed())?;
        if magnitude == 0 {
            return Err(malformed());
        }

        let unit = AlertUnit::from_token(&parts[2]).ok_or_else(|| ParseError::UnknownAlertUnit {
            unit: parts[2].to_string(),
        })?;

        alerts.push(AlertOffset::new(magnitude, unit));
    }

    tracing::debug!(count = alerts.len(), remaining = %head, "parsed alert clause");
    Ok((alerts, head))
}
