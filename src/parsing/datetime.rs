//! Conversation timestamp parsing.
//!
//! The export writes `Date and time:` values as `MM/DD/YY hh:mm:ss AM|PM`.
//! Values that don't fit the configured format yield `None`; a malformed
//! timestamp is annotated, never fatal.

use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, NaiveDateTime};

/// Default chrono format for `Date and time:` values.
pub const DEFAULT_DATETIME_FORMAT: &str = "%m/%d/%y %I:%M:%S %p";

/// Parses a raw `Date and time:` value with `format`.
///
/// Two-digit years pivot at 69: `00`-`68` are 20xx and `69`-`99` are 19xx.
///
/// # Example
///
/// ```
/// use convforensic::parsing::{DEFAULT_DATETIME_FORMAT, parse_conversation_datetime};
///
/// let ts = parse_conversation_datetime("10/10/19 4:10:12 PM", DEFAULT_DATETIME_FORMAT).unwrap();
/// assert_eq!(ts.to_string(), "2019-10-10 16:10:12");
///
/// assert!(parse_conversation_datetime("yesterday", DEFAULT_DATETIME_FORMAT).is_none());
/// ```
pub fn parse_conversation_datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(value, format).ok()?;
    // chrono pivots `%y` at 70, one year later than the export tooling.
    if format.contains("%y") && parsed.year() == 2069 {
        return parsed.with_year(1969);
    }
    Some(parsed)
}

/// Returns `false` if chrono cannot interpret `format` as a strftime string.
pub fn is_valid_format(format: &str) -> bool {
    !format.is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}
