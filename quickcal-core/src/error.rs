//! Typed parse failures.
//!
//! A missing date, time or calendar clause is never an error: those stages fall
//! back to their defaults. Only a reminder clause that is present but unreadable
//! stops the parse.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    /// The unit token is not one of minute(s), hour(s), day(s), week(s).
    #[error("unknown alert unit '{unit}' (expected minute(s), hour(s), day(s) or week(s))")]
    UnknownAlertUnit { unit: String },

    /// A comma-separated entry of an "alert ... before" clause is not `<N> <unit> before`.
    #[error("malformed alert '{chunk}' (expected e.g. 'alert 15 minutes before')")]
    MalformedAlertList { chunk: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ParseError>;
