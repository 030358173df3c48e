//! Line-based prompt: ask for the event sentence, then confirm or re-edit.

use anyhow::Result;
use std::io::{BufRead, Write};

use quickcal_core::ParsedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
    Edit,
}

/// Ask for the event description.
///
/// When re-editing, `previous` is shown and an empty answer keeps it. With no
/// previous text, an empty answer or end of input cancels (`None`).
pub fn read_event_text<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    previous: Option<&str>,
) -> Result<Option<String>> {
    match previous {
        Some(p) => {
            writeln!(output, "Previous: {p}")?;
            write!(output, "Edit the description of your event (blank keeps it): ")?;
        }
        None => write!(output, "Enter the description of your new event: ")?,
    }
    output.flush().ok();

    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    let s = s.trim();

    if s.is_empty() {
        return Ok(previous.map(str::to_string));
    }
    Ok(Some(s.to_string()))
}

/// Show the parsed event and ask whether to create it.
///
/// Blank or "y" accepts, "n" rejects, "e" asks to edit the text. End of input
/// rejects. Anything else asks again.
pub fn confirm<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    event: &ParsedEvent,
) -> Result<Confirm> {
    writeln!(output, "\n{event}")?;
    loop {
        write!(output, "Are you sure? [Y/n/e(dit)] ")?;
        output.flush().ok();

        let mut s = String::new();
        if input.read_line(&mut s)? == 0 {
            return Ok(Confirm::No);
        }

        match s.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(Confirm::Yes),
            "n" | "no" => return Ok(Confirm::No),
            "e" | "edit" => return Ok(Confirm::Edit),
            other => {
                tracing::debug!(answer = other, "unrecognized confirmation answer");
                writeln!(output, "Please answer y, n or e.")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn event() -> ParsedEvent {
        let reference = NaiveDate::from_ymd_opt(2010, 3, 21).unwrap();
        quickcal_core::parse("Dinner tomorrow 9pm", reference, &["Home"]).unwrap()
    }

    #[test]
    fn test_read_new_text() {
        let mut out = Vec::new();
        let text = read_event_text(Cursor::new("Dinner tomorrow 9pm\n"), &mut out, None).unwrap();
        assert_eq!(text.as_deref(), Some("Dinner tomorrow 9pm"));
    }

    #[test]
    fn test_blank_new_text_cancels() {
        let mut out = Vec::new();
        assert_eq!(read_event_text(Cursor::new("\n"), &mut out, None).unwrap(), None);
        assert_eq!(read_event_text(Cursor::new(""), &mut out, None).unwrap(), None);
    }

    #[test]
    fn test_blank_edit_keeps_previous() {
        let mut out = Vec::new();
        let text = read_event_text(Cursor::new("\n"), &mut out, Some("Dinner 9pm")).unwrap();
        assert_eq!(text.as_deref(), Some("Dinner 9pm"));
        assert!(String::from_utf8(out).unwrap().contains("Previous: Dinner 9pm"));
    }

    #[test]
    fn test_confirm_answers() {
        let mut out = Vec::new();
        assert_eq!(confirm(Cursor::new("\n"), &mut out, &event()).unwrap(), Confirm::Yes);
        assert_eq!(confirm(Cursor::new("N\n"), &mut out, &event()).unwrap(), Confirm::No);
        assert_eq!(confirm(Cursor::new("e\n"), &mut out, &event()).unwrap(), Confirm::Edit);
        assert_eq!(confirm(Cursor::new(""), &mut out, &event()).unwrap(), Confirm::No);
    }

    #[test]
    fn test_confirm_asks_again() {
        let mut out = Vec::new();
        let answer = confirm(Cursor::new("maybe\ny\n"), &mut out, &event()).unwrap();
        assert_eq!(answer, Confirm::Yes);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("Event Title: Dinner"));
        assert!(shown.contains("Please answer y, n or e."));
    }
}
