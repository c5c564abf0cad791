//! Lenient parsing of hand-entered dates.
//!
//! Historical records are incomplete by nature, so a date that cannot be read
//! is never fatal: it degrades to a bare year (if one was supplied) and then to
//! "unknown". Callers get the raw text back so they can surface a warning.

use chrono::NaiveDate;

use crate::EventDate;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Outcome of [`parse_event_date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenientDate {
    pub date: EventDate,
    /// Non-empty input text that could not be read as a date.
    pub malformed: Option<String>,
}

/// Parse a single calendar date, accepting a few common separators.
///
/// Returns `None` for empty or unreadable input.
pub fn parse_lenient_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Combine form input for an event date: free-text date plus optional bare year.
///
/// Precedence: a readable date, then the explicit `year`, then a bare year typed
/// into the date field (`"1702"`), then `Unknown`.
pub fn parse_event_date(date_text: Option<&str>, year: Option<i32>) -> LenientDate {
    let text = date_text.map(str::trim).filter(|t| !t.is_empty());

    let Some(text) = text else {
        return LenientDate {
            date: EventDate::from_parts(None, year),
            malformed: None,
        };
    };

    if let Some(d) = parse_lenient_date(text) {
        return LenientDate {
            date: EventDate::Exact(d),
            malformed: None,
        };
    }

    if let Some(y) = year {
        return LenientDate {
            date: EventDate::Year(y),
            malformed: Some(text.to_string()),
        };
    }

    if text.len() <= 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(y) = text.parse::<i32>() {
            return LenientDate {
                date: EventDate::Year(y),
                malformed: None,
            };
        }
    }

    LenientDate {
        date: EventDate::Unknown,
        malformed: Some(text.to_string()),
    }
}
