//! "in <calendar>" clause detection against a caller-supplied list of names.

use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Find which known calendar the text names, and strip the clause.
///
/// Names are tried in the order given and the first hit wins, so callers
/// decide precedence between overlapping names ("Work" vs "Work Travel").
/// Without a hit the first known name is the default, or `None` for an empty
/// list.
pub fn parse_event_calendar<S: AsRef<str>>(
    text: &str,
    known_calendar_names: &[S],
) -> Result<(Option<String>, String)> {
    let default = known_calendar_names.first().map(|n| n.as_ref().to_string());

    for name in known_calendar_names {
        let name = name.as_ref();
        if name.trim().is_empty() {
            continue;
        }

        let re = clause_pattern(name)?;
        if let Some(caps) = re.captures(text) {
            let pre = caps.get(1).map_or("", |m| m.as_str());
            let post = caps.get(2).map_or("", |m| m.as_str());
            tracing::debug!(calendar = name, "matched calendar clause");
            return Ok((Some(name.to_string()), format!("{pre}{post}")));
        }
    }

    tracing::trace!(calendar = ?default, "no calendar clause, using default");
    Ok((default, text.to_string()))
}

fn clause_pattern(name: &str) -> Result<Regex> {
    let pattern = format!(r"^(.*)\bin\s+{}(\s.*)?$", regex::escape(name.trim()));
    Ok(RegexBuilder::new(&pattern).case_insensitive(true).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDARS: [&str; 3] = ["Home", "Work", "Work Travel"];

    #[test]
    fn test_default_is_first_known() {
        let (name, rest) = parse_event_calendar("Dinner", &CALENDARS).unwrap();
        assert_eq!(name.as_deref(), Some("Home"));
        assert_eq!(rest, "Dinner");
    }

    #[test]
    fn test_empty_list_has_no_calendar() {
        let names: [&str; 0] = [];
        let (name, rest) = parse_event_calendar("Dinner in Work", &names).unwrap();
        assert_eq!(name, None);
        assert_eq!(rest, "Dinner in Work");
    }

    #[test]
    fn test_clause_is_stripped_case_insensitively() {
        let (name, rest) = parse_event_calendar("Standup in work", &CALENDARS).unwrap();
        assert_eq!(name.as_deref(), Some("Work"));
        assert_eq!(rest.trim(), "Standup");

        let (name, rest) = parse_event_calendar("Standup in Work with team", &CALENDARS).unwrap();
        assert_eq!(name.as_deref(), Some("Work"));
        assert_eq!(rest, "Standup with team");
    }

    #[test]
    fn test_list_order_breaks_ties() {
        // "Work" comes first and "in Work Travel" also reads as "in Work"
        let (name, _) = parse_event_calendar("Flight in Work Travel", &CALENDARS).unwrap();
        assert_eq!(name.as_deref(), Some("Work"));

        let ordered = ["Work Travel", "Work"];
        let (name, rest) = parse_event_calendar("Flight in Work Travel", &ordered).unwrap();
        assert_eq!(name.as_deref(), Some("Work Travel"));
        assert_eq!(rest.trim(), "Flight");
    }

    #[test]
    fn test_name_must_be_whole() {
        let (name, rest) = parse_event_calendar("Dinner in Homer", &CALENDARS).unwrap();
        assert_eq!(name.as_deref(), Some("Home"));
        assert_eq!(rest, "Dinner in Homer");

        // "within" does not start an "in" clause
        let (_, rest) = parse_event_calendar("Lunch within Work", &CALENDARS).unwrap();
        assert_eq!(rest, "Lunch within Work");
    }

    #[test]
    fn test_names_are_literal() {
        let names = ["C++ (dev)"];
        let (name, rest) = parse_event_calendar("Review in c++ (dev)", &names).unwrap();
        assert_eq!(name.as_deref(), Some("C++ (dev)"));
        assert_eq!(rest.trim(), "Review");
    }
}
