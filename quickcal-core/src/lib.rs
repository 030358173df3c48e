//! quickcal-core: natural-language event parsing.
//!
//! `parse` turns a sentence like "Dinner with Andre March 23rd at 9pm alert 15
//! minutes before" into a [`ParsedEvent`]. The stages run in a fixed order and
//! each one only deletes the span it recognized:
//!
//! 1. reminder clause ([`parse_alerts`])
//! 2. time of day and date ([`parse_event_date`])
//! 3. "in <calendar>" clause ([`parse_event_calendar`])
//!
//! Whatever is left becomes the title. The reference date and the known
//! calendar names are always supplied by the caller, so parsing is a pure
//! function of its inputs.

pub mod alert;
pub mod calendar_name;
pub mod datetime;
pub mod error;
pub mod event;
pub mod resolve;

pub use alert::{AlertOffset, AlertUnit, parse_alerts};
pub use calendar_name::parse_event_calendar;
pub use datetime::{TimeOfDay, parse_event_date, parse_time_of_day};
pub use error::{ParseError, Result};
pub use event::{CalendarDate, ParsedEvent};

use chrono::NaiveDate;

/// Parse one event sentence.
///
/// `reference` is "today" for relative dates and year rollover.
/// `known_calendar_names` is tried in order for an "in <name>" clause; its first
/// entry is the default calendar.
pub fn parse<S: AsRef<str>>(
    text: &str,
    reference: NaiveDate,
    known_calendar_names: &[S],
) -> Result<ParsedEvent> {
    tracing::debug!(%text, %reference, "parsing event");

    let (alerts, rest) = parse_alerts(text)?;
    let (date, rest) = parse_event_date(&rest, reference)?;
    let (calendar_name, rest) = parse_event_calendar(&rest, known_calendar_names)?;

    let title = datetime::collapse_whitespace(&rest);
    Ok(ParsedEvent::new(title, date, alerts, calendar_name))
}
