//! Validity windows: period tokens, date parsing and overlap detection.
//!
//! Every window is half-open, `[from, until)`, in UTC. Dates cross the
//! service boundary as `YYYY-MM-DD` and are read as UTC midnight.

use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use crate::{EngineError, ResultEngine};

/// Lexical format of every date exchanged with callers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Symbolic duration resolved to a concrete window anchored at "now".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// Returns `[now, now + period)`.
    ///
    /// Month and year steps follow the calendar and clamp to the last day of
    /// the target month (Jan 31 + 1 month = Feb 28 or 29).
    pub fn window(self, now: DateTime<Utc>) -> ResultEngine<Window> {
        let until = match self {
            Self::Day => now.checked_add_days(Days::new(1)),
            Self::Week => now.checked_add_days(Days::new(7)),
            Self::Month => now.checked_add_months(Months::new(1)),
            Self::Year => now.checked_add_months(Months::new(12)),
        }
        .ok_or_else(|| EngineError::Validation("invalid period: out of range".to_string()))?;
        Ok(Window { from: now, until })
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(EngineError::Validation(format!("invalid period: {other}"))),
        }
    }
}

/// Half-open validity window. `from < until` holds for every value built by
/// this module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl Window {
    /// Orders the two bounds, swapping them when given in reverse.
    ///
    /// Equal bounds describe an empty window and are rejected.
    pub fn ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> ResultEngine<Self> {
        if start == end {
            return Err(EngineError::Validation(
                "start and end dates must differ".to_string(),
            ));
        }
        let (from, until) = if start < end {
            (start, end)
        } else {
            (end, start)
        };
        Ok(Self { from, until })
    }

    /// Strict intersection: windows that only touch do not overlap.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.until > other.from && self.from < other.until
    }
}

/// Parse a `YYYY-MM-DD` string as UTC midnight.
///
/// The layout is fixed: zero-padded month and day, no surrounding spaces.
pub fn parse_date(value: &str) -> ResultEngine<DateTime<Utc>> {
    let bytes = value.as_bytes();
    let fixed_layout = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    fixed_layout
        .then(|| NaiveDate::parse_from_str(value, DATE_FORMAT).ok())
        .flatten()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            EngineError::Validation(format!("invalid date '{value}': expected YYYY-MM-DD"))
        })
}

/// Render an instant in the boundary date format.
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format(DATE_FORMAT).to_string()
}
