//! Relative date resolution against an injected reference date.

use chrono::{Datelike, Days, NaiveDate, Weekday};

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// 1-based month number for an English month name, any case.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// Full English weekday name, any case. Abbreviations are not accepted.
pub fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn tomorrow(reference: NaiveDate) -> NaiveDate {
    reference.checked_add_days(Days::new(1)).unwrap_or(reference)
}

/// First date on or after `reference` that falls on `weekday`.
pub fn next_weekday(reference: NaiveDate, weekday: Weekday) -> NaiveDate {
    let target = weekday.num_days_from_monday();
    let ahead = (7 + target - reference.weekday().num_days_from_monday()) % 7;
    reference
        .checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(reference)
}

/// Year for a bare month/day: a month earlier than the reference month means next year.
pub fn rollover_year(reference: NaiveDate, month: u32) -> i32 {
    if month < reference.month() {
        reference.year() + 1
    } else {
        reference.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_from_name("January"), Some(1));
        assert_eq!(month_from_name("MAY"), Some(5));
        assert_eq!(month_from_name("december"), Some(12));
        assert_eq!(month_from_name("Sept"), None);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_from_name("Wednesday"), Some(Weekday::Wed));
        assert_eq!(weekday_from_name("SUNDAY"), Some(Weekday::Sun));
        assert_eq!(weekday_from_name("wed"), None);
    }

    #[test]
    fn test_tomorrow_rolls_month_and_year() {
        assert_eq!(tomorrow(d(2010, 3, 21)), d(2010, 3, 22));
        assert_eq!(tomorrow(d(2010, 3, 31)), d(2010, 4, 1));
        assert_eq!(tomorrow(d(2010, 12, 31)), d(2011, 1, 1));
        assert_eq!(tomorrow(d(2012, 2, 28)), d(2012, 2, 29));
    }

    #[test]
    fn test_next_weekday_is_inclusive() {
        // 2010-03-21 is a Sunday
        let sunday = d(2010, 3, 21);
        assert_eq!(next_weekday(sunday, Weekday::Sun), sunday);
        assert_eq!(next_weekday(sunday, Weekday::Mon), d(2010, 3, 22));
        assert_eq!(next_weekday(sunday, Weekday::Wed), d(2010, 3, 24));
        assert_eq!(next_weekday(sunday, Weekday::Sat), d(2010, 3, 27));
    }

    #[test]
    fn test_next_weekday_crosses_year() {
        // 2010-12-30 is a Thursday
        assert_eq!(next_weekday(d(2010, 12, 30), Weekday::Mon), d(2011, 1, 3));
    }

    #[test]
    fn test_rollover_year() {
        let reference = d(2010, 3, 21);
        assert_eq!(rollover_year(reference, 1), 2011);
        assert_eq!(rollover_year(reference, 2), 2011);
        assert_eq!(rollover_year(reference, 3), 2010);
        assert_eq!(rollover_year(reference, 12), 2010);
    }
}
