//! Calendar sink: turn a parsed event into ICS and hand it off.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use quickcal_core::ParsedEvent;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::{SinkAction, SinkSection};

/// Create-event fields for an external calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub summary: String,
    /// Wall-clock start in the sink's time zone.
    pub start: NaiveDateTime,
    pub all_day: bool,
    pub duration_minutes: i64,
    pub location: Option<String>,
    pub alarm_minutes_before: Option<i64>,
    pub calendar: Option<String>,
}

impl EventDraft {
    pub fn from_event(event: &ParsedEvent, default_duration_minutes: i64) -> Result<Self> {
        let start = event.date.to_naive_datetime().ok_or_else(|| {
            anyhow!(
                "not a valid date and time: {} {}",
                event.date.date_string(),
                event.date.time_string()
            )
        })?;

        Ok(Self {
            summary: event.title.clone(),
            start,
            all_day: event.is_all_day,
            duration_minutes: default_duration_minutes.max(1),
            location: event.location.clone(),
            alarm_minutes_before: event.alert().map(|a| a.minutes_before()),
            calendar: event.calendar_name.clone(),
        })
    }
}

/// Where the rendered ICS goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Print,
    Targets { ics: Option<PathBuf>, import: bool },
}

/// `--ics`/`--import` win when given; otherwise `sink.default_action` decides.
pub fn choose_delivery(ics: Option<PathBuf>, import: bool, sink: &SinkSection) -> Delivery {
    if ics.is_some() || import {
        return Delivery::Targets { ics, import };
    }
    match sink.default_action {
        SinkAction::Print => Delivery::Print,
        SinkAction::Ics => Delivery::Targets {
            ics: Some(sink.ics_path.clone()),
            import: false,
        },
        SinkAction::Gcalcli => Delivery::Targets {
            ics: None,
            import: true,
        },
    }
}

pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse().map_err(|_| anyhow!("invalid timezone: {tz}"))
}

fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    let local_dt = tz
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;
    Ok(local_dt.with_timezone(&Utc))
}

/// Emit a VCALENDAR with one VEVENT per draft.
///
/// Timed events are converted from `tz` and written in UTC; all-day events use
/// floating DATE values and span one day. The first calendar name found is
/// also written as `X-WR-CALNAME`.
pub fn render_ics(drafts: &[EventDraft], tz: Tz) -> Result<String> {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//quickcal//EN\n");
    if let Some(cal) = drafts.iter().find_map(|d| d.calendar.as_deref()) {
        s.push_str(&format!("X-WR-CALNAME:{}\n", ics_text(cal)));
    }

    for (i, d) in drafts.iter().enumerate() {
        s.push_str("BEGIN:VEVENT\n");
        s.push_str(&format!(
            "UID:quickcal-{}-{}@quickcal\n",
            d.start.format("%Y%m%dT%H%M%S"),
            i
        ));

        if d.all_day {
            let day = d.start.date();
            let next = day.succ_opt().ok_or_else(|| anyhow!("no day after {day}"))?;
            s.push_str(&format!("DTSTART;VALUE=DATE:{}\n", day.format("%Y%m%d")));
            s.push_str(&format!("DTEND;VALUE=DATE:{}\n", next.format("%Y%m%d")));
        } else {
            let start = local_to_utc(d.start, tz)?;
            let end = TimeDelta::try_minutes(d.duration_minutes)
                .and_then(|length| start.checked_add_signed(length))
                .ok_or_else(|| {
                    anyhow!("event duration of {} minutes is out of range", d.duration_minutes)
                })?;
            s.push_str(&format!("DTSTART:{}\n", start.format("%Y%m%dT%H%M%SZ")));
            s.push_str(&format!("DTEND:{}\n", end.format("%Y%m%dT%H%M%SZ")));
        }

        s.push_str(&format!("SUMMARY:{}\n", ics_text(&d.summary)));
        if let Some(loc) = d.location.as_deref().filter(|l| !l.is_empty()) {
            s.push_str(&format!("LOCATION:{}\n", ics_text(loc)));
        }
        if let Some(cal) = &d.calendar {
            s.push_str(&format!("CATEGORIES:{}\n", ics_text(cal)));
        }
        if let Some(minutes) = d.alarm_minutes_before {
            s.push_str("BEGIN:VALARM\n");
            s.push_str("ACTION:DISPLAY\n");
            s.push_str(&format!("DESCRIPTION:{}\n", ics_text(&d.summary)));
            s.push_str(&format!("TRIGGER:-PT{minutes}M\n"));
            s.push_str("END:VALARM\n");
        }
        s.push_str("END:VEVENT\n");
    }

    s.push_str("END:VCALENDAR\n");
    Ok(s)
}

/// RFC 5545 TEXT value: backslash-escape `\ , ;` and newlines, drop CR.
fn ics_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | ',' | ';' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

pub fn write_ics(ics: &str, path: &Path) -> Result<()> {
    fs::write(path, ics).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Feed the ICS text to `gcalcli import` on stdin.
///
/// `gcalcli` must already be authenticated; it prints its own progress.
pub fn import_with_gcalcli(ics: &str, calendar: Option<&str>) -> Result<()> {
    let gcalcli = which::which("gcalcli").map_err(|_| {
        anyhow!(
            "gcalcli was not found on PATH. Install and authenticate it, \
             or save the event instead with `quickcal add --ics <PATH> <TEXT>`"
        )
    })?;

    let mut cmd = Command::new(&gcalcli);
    if let Some(cal) = calendar {
        cmd.arg("--calendar").arg(cal);
    }
    cmd.arg("import").stdin(Stdio::piped());
    tracing::debug!(path = %gcalcli.display(), ?calendar, "importing event with gcalcli");

    let mut child = cmd
        .spawn()
        .with_context(|| format!("start {}", gcalcli.display()))?;
    let mut stdin = child.stdin.take().context("gcalcli stdin was not piped")?;
    stdin
        .write_all(ics.as_bytes())
        .context("send ICS to gcalcli")?;
    drop(stdin);

    let status = child.wait().context("wait for gcalcli")?;
    if !status.success() {
        bail!("gcalcli import exited with {status}");
    }
    Ok(())
}
