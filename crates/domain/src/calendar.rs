//! Calendar-day normalization for date tokens authored by the model.
//!
//! `"today"`, `"tomorrow"`, and explicit `YYYY-MM-DD` strings all resolve to
//! the same canonical [`DayKey`], so handler lookups by day agree regardless
//! of which form the model used.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Canonical calendar-day key.
///
/// A plain `YYYY-MM-DD` value: every caller that resolves an instant through
/// [`normalize`] lands on the caller's **local** calendar day, after which
/// all timezones see the identical key. Keys order and hash like dates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The following calendar day (saturating at the calendar's end).
    pub fn next(&self) -> DayKey {
        DayKey(self.0.succ_opt().unwrap_or(self.0))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DayKey)
    }
}

/// Source of "now" for date-sensitive capabilities.
///
/// Injected everywhere a handler needs the current instant; nothing below
/// the conversation boundary reads the wall clock directly, so date logic
/// is testable without simulating system time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`] used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Resolve a model-authored date token against a reference instant.
///
/// The local calendar day is computed in `local_tz` first and only then
/// expressed as a key; truncating `reference` in a fixed zone directly can
/// land on the wrong day near local midnight. `"tomorrow"` is the local
/// today plus one calendar day. Explicit `YYYY-MM-DD` strings are taken as
/// already-unambiguous calendar days and bypass the local conversion.
///
/// Unrecognized tokens fall back to the reference day rather than failing;
/// callers that need strict validation must pre-validate.
pub fn normalize(token: &str, reference: DateTime<Utc>, local_tz: Tz) -> DayKey {
    let local_today = reference.with_timezone(&local_tz).date_naive();
    match token.trim().to_ascii_lowercase().as_str() {
        "today" => DayKey(local_today),
        "tomorrow" => DayKey(local_today).next(),
        other => match NaiveDate::parse_from_str(other, "%Y-%m-%d") {
            Ok(date) => DayKey(date),
            Err(_) => {
                tracing::debug!(token = other, "unrecognized date token, using reference day");
                DayKey(local_today)
            }
        },
    }
}

/// Parse a timezone string into a `chrono_tz::Tz`, falling back to UTC.
pub fn parse_tz(tz: &str) -> Tz {
    tz.parse::<Tz>().unwrap_or(chrono_tz::UTC)
}
