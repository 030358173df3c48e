//! Date and time-of-day extraction.
//!
//! The time rule always runs first. The date rules then run in a fixed order and
//! the first one that matches wins:
//!
//! 1. month name + day ("March 23rd")
//! 2. YYYY/MM/DD
//! 3. MM/DD[/YYYY]
//! 4. today / tomorrow
//! 5. weekday name
//!
//! Every rule deletes its matched span and glues the text on either side back
//! together, so the words left over keep their original order.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use crate::error::Result;
use crate::event::CalendarDate;
use crate::resolve::{month_from_name, next_weekday, rollover_year, tomorrow, weekday_from_name};

/// Year/month/day as written. Not validated against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for DayFields {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub day: DayFields,
    pub remaining: String,
}

type DateRule = fn(&str, NaiveDate) -> Result<Option<DateMatch>>;

const DATE_RULES: [(&str, DateRule); 5] = [
    ("month-name", month_name_date),
    ("year-month-day", year_month_day),
    ("month-day", month_day_year),
    ("relative", relative_day),
    ("weekday", weekday_name),
];

/// Hour and minute pulled out by the time rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

/// Extract the event date and time, returning the whitespace-normalized rest.
///
/// Without any date clause the date is `reference`; without a time clause all
/// time fields are zero.
pub fn parse_event_date(text: &str, reference: NaiveDate) -> Result<(CalendarDate, String)> {
    let (time, mut remaining) = match parse_time_of_day(text)? {
        Some((time, rest)) => (Some(time), rest),
        None => (None, text.to_string()),
    };

    let mut day = DayFields::from(reference);
    for (name, rule) in DATE_RULES {
        if let Some(found) = rule(&remaining, reference)? {
            tracing::debug!(rule = name, day = ?found.day, "matched date rule");
            day = found.day;
            remaining = found.remaining;
            break;
        }
        tracing::trace!(rule = name, "date rule did not match");
    }

    let time = time.unwrap_or(TimeOfDay { hour: 0, minute: 0 });
    let date = CalendarDate::new(day.year, day.month, day.day, time.hour, time.minute, 0);

    Ok((date, collapse_whitespace(&remaining)))
}

/// `H[:MM] am|pm|a|p`, preceded by whitespace or the start of the text.
///
/// A pm marker adds 12 to the hour as written, so "12pm" gives hour 24 and
/// "12am" stays 12. A dangling "at" before the time is removed along with it.
pub fn parse_time_of_day(text: &str) -> Result<Option<(TimeOfDay, String)>> {
    let time_re = Regex::new(r"(?i)^(?:(.*)\s)?(\d{1,2}):?(\d{2})? ?(am|pm|a|p)\b(.*)$")?;
    let dangling_at_re = Regex::new(r"(?i)\s*\bat\s*$")?;

    let Some(caps) = time_re.captures(text) else {
        return Ok(None);
    };

    let Ok(mut hour) = caps[2].parse::<u32>() else {
        return Ok(None);
    };
    let minute = match caps.get(3) {
        Some(m) => m.as_str().parse::<u32>().unwrap_or(0),
        None => 0,
    };
    if caps[4].to_lowercase().starts_with('p') {
        hour += 12;
    }

    let pre = dangling_at_re.replace(group(&caps, 1), "");
    let remaining = format!("{}{}", pre, group(&caps, 5));

    tracing::debug!(hour, minute, "matched time of day");
    Ok(Some((TimeOfDay { hour, minute }, remaining)))
}

/// "March 23", "march 23rd". A month before the reference month means next year.
fn month_name_date(text: &str, reference: NaiveDate) -> Result<Option<DateMatch>> {
    let re = Regex::new(concat!(
        r"(?i)^(.*)\b(january|february|march|april|may|june|july|august|",
        r"september|october|november|december) (\d+)(?:st|nd|rd|th|\b)(.*)$"
    ))?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    let (Some(month), Ok(day)) = (month_from_name(&caps[2]), caps[3].parse::<u32>()) else {
        return Ok(None);
    };

    Ok(Some(DateMatch {
        day: DayFields {
            year: rollover_year(reference, month),
            month,
            day,
        },
        remaining: splice(&caps, 1, 4),
    }))
}

/// "2010/3/23", "2010-03-23": any single non-alphanumeric separator.
fn year_month_day(text: &str, _reference: NaiveDate) -> Result<Option<DateMatch>> {
    let re = Regex::new(r"^(.*)\b(\d{4})[^[:alnum:]](\d{1,2})[^[:alnum:]](\d{1,2})\b(.*)$")?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    let (Ok(year), Ok(month), Ok(day)) = (
        caps[2].parse::<i32>(),
        caps[3].parse::<u32>(),
        caps[4].parse::<u32>(),
    ) else {
        return Ok(None);
    };

    Ok(Some(DateMatch {
        day: DayFields { year, month, day },
        remaining: splice(&caps, 1, 5),
    }))
}

/// "3/23/2010", "03-23". Without a year the reference year is kept as is.
fn month_day_year(text: &str, reference: NaiveDate) -> Result<Option<DateMatch>> {
    let re = Regex::new(
        r"^(?:(.*)\s)?(\d{1,2})[^[:alnum:]](\d{1,2})(?:[^[:alnum:]](\d{4}))?\b(.*)$",
    )?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    let (Ok(month), Ok(day)) = (caps[2].parse::<u32>(), caps[3].parse::<u32>()) else {
        return Ok(None);
    };
    let year = match caps.get(4) {
        Some(y) => y.as_str().parse::<i32>().unwrap_or(reference.year()),
        None => reference.year(),
    };

    Ok(Some(DateMatch {
        day: DayFields { year, month, day },
        remaining: splice(&caps, 1, 5),
    }))
}

fn relative_day(text: &str, reference: NaiveDate) -> Result<Option<DateMatch>> {
    let re = Regex::new(r"(?i)^(.*)\b(today|tomorrow)\b(.*)$")?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    let date = if caps[2].eq_ignore_ascii_case("tomorrow") {
        tomorrow(reference)
    } else {
        reference
    };

    Ok(Some(DateMatch {
        day: date.into(),
        remaining: splice(&caps, 1, 3),
    }))
}

/// Next occurrence of the weekday, counting the reference day itself.
fn weekday_name(text: &str, reference: NaiveDate) -> Result<Option<DateMatch>> {
    let re = Regex::new(
        r"(?i)^(.*)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b(.*)$",
    )?;

    let Some(caps) = re.captures(text) else {
        return Ok(None);
    };
    let Some(weekday) = weekday_from_name(&caps[2]) else {
        return Ok(None);
    };

    Ok(Some(DateMatch {
        day: next_weekday(reference, weekday).into(),
        remaining: splice(&caps, 1, 3),
    }))
}

fn group<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str())
}

/// Text before and after the matched span, joined.
fn splice(caps: &Captures<'_>, pre: usize, post: usize) -> String {
    format!("{}{}", group(caps, pre), group(caps, post))
}

/// Collapse runs of whitespace to one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2010, 3, 21).unwrap()
    }

    fn parse(text: &str) -> (CalendarDate, String) {
        parse_event_date(text, reference()).unwrap()
    }

    #[test]
    fn test_time_forms() {
        for (text, hour, minute) in [
            ("Dinner 9pm", 21, 0),
            ("Dinner 9p", 21, 0),
            ("Dinner 9 pm", 21, 0),
            ("Dinner 9am", 9, 0),
            ("Dinner 9 a", 9, 0),
            ("Dinner 9:30 p", 21, 30),
            ("Dinner 9:30am", 9, 30),
            ("Dinner 930pm", 21, 30),
            ("Dinner 9PM", 21, 0),
        ] {
            let (time, rest) = parse_time_of_day(text).unwrap().unwrap();
            assert_eq!((time.hour, time.minute), (hour, minute), "{text}");
            assert_eq!(collapse_whitespace(&rest), "Dinner", "{text}");
        }
    }

    #[test]
    fn test_noon_is_not_wrapped() {
        // pm adds 12 to the written hour without 12-hour clock correction
        let (time, _) = parse_time_of_day("Lunch 12pm").unwrap().unwrap();
        assert_eq!(time.hour, 24);
        let (time, _) = parse_time_of_day("Early 12am").unwrap().unwrap();
        assert_eq!(time.hour, 12);
    }

    #[test]
    fn test_time_strips_dangling_at() {
        let (_, rest) = parse_time_of_day("Dinner March 23rd at 9pm").unwrap().unwrap();
        assert_eq!(rest, "Dinner March 23rd");
        // "at" inside a word is left alone
        let (_, rest) = parse_time_of_day("Feed the cat 9pm").unwrap().unwrap();
        assert_eq!(collapse_whitespace(&rest), "Feed the cat");
    }

    #[test]
    fn test_time_does_not_start_mid_number() {
        let (time, _) = parse_time_of_day("Dinner 9:30 p").unwrap().unwrap();
        assert_eq!((time.hour, time.minute), (21, 30));
    }

    #[test]
    fn test_time_at_start_of_text() {
        let (time, rest) = parse_time_of_day("9pm Dinner").unwrap().unwrap();
        assert_eq!(time.hour, 21);
        assert_eq!(collapse_whitespace(&rest), "Dinner");
    }

    #[test]
    fn test_no_time() {
        assert!(parse_time_of_day("Dinner with Andre").unwrap().is_none());
        assert!(parse_time_of_day("Dinner for 2 apples").unwrap().is_none());
    }

    #[test]
    fn test_month_name_with_suffixes() {
        for text in [
            "Dinner March 23",
            "Dinner March 23rd",
            "Dinner march 23nd",
            "march 23 Dinner",
        ] {
            let (date, rest) = parse(text);
            assert_eq!((date.year, date.month, date.day), (2010, 3, 23), "{text}");
            assert_eq!(rest, "Dinner", "{text}");
        }
    }

    #[test]
    fn test_month_name_rolls_forward() {
        let (date, _) = parse("Dinner January 23");
        assert_eq!((date.year, date.month, date.day), (2011, 1, 23));
        let (date, _) = parse("Dinner December 1");
        assert_eq!(date.year, 2010);
    }

    #[test]
    fn test_year_month_day() {
        for text in ["Dinner 2012/3/23", "Dinner 2012-03-23", "Dinner 2012.3.23"] {
            let (date, rest) = parse(text);
            assert_eq!((date.year, date.month, date.day), (2012, 3, 23), "{text}");
            assert_eq!(rest, "Dinner");
        }
    }

    #[test]
    fn test_month_day_year() {
        let (date, rest) = parse("Dinner 12/25/2012 with family");
        assert_eq!((date.year, date.month, date.day), (2012, 12, 25));
        assert_eq!(rest, "Dinner with family");

        // no year: reference year, no rollover even for an earlier month
        let (date, rest) = parse("Dinner 1/5 with family");
        assert_eq!((date.year, date.month, date.day), (2010, 1, 5));
        assert_eq!(rest, "Dinner with family");
    }

    #[test]
    fn test_relative_days() {
        let (date, rest) = parse("Dinner today");
        assert_eq!((date.year, date.month, date.day), (2010, 3, 21));
        assert_eq!(rest, "Dinner");

        let (date, _) = parse("Dinner Tomorrow");
        assert_eq!((date.year, date.month, date.day), (2010, 3, 22));

        let new_years_eve = NaiveDate::from_ymd_opt(2010, 12, 31).unwrap();
        let (date, _) = parse_event_date("Party tomorrow", new_years_eve).unwrap();
        assert_eq!((date.year, date.month, date.day), (2011, 1, 1));
    }

    #[test]
    fn test_weekday() {
        let (date, rest) = parse("Dinner wednesday");
        assert_eq!((date.year, date.month, date.day), (2010, 3, 24));
        assert_eq!(rest, "Dinner");

        // the reference day itself counts
        let (date, _) = parse("Dinner Sunday");
        assert_eq!((date.year, date.month, date.day), (2010, 3, 21));
    }

    #[test]
    fn test_first_rule_wins() {
        // month name beats the weekday, which stays in the title
        let (date, rest) = parse("Brunch friday March 23");
        assert_eq!((date.month, date.day), (3, 23));
        assert_eq!(rest, "Brunch friday");

        // numeric dates beat relative keywords
        let (date, rest) = parse("Dinner today 4/1");
        assert_eq!((date.month, date.day), (4, 1));
        assert_eq!(rest, "Dinner today");
    }

    #[test]
    fn test_weekday_inside_word_is_ignored() {
        let (date, rest) = parse("Pre-mondays meeting");
        assert_eq!((date.month, date.day), (3, 21));
        assert_eq!(rest, "Pre-mondays meeting");
    }

    #[test]
    fn test_no_date_is_reference() {
        let (date, rest) = parse("  Dinner   with Andre ");
        assert_eq!(date, CalendarDate::new(2010, 3, 21, 0, 0, 0));
        assert_eq!(rest, "Dinner with Andre");
    }
}
