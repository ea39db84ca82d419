use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format used for range fields. Second-grained, no zone suffix;
/// the zone is supplied when formatting.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One side of a raw time range: an absolute instant or an unresolved
/// textual value (relative expression or user-typed timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimePoint {
    Absolute(DateTime<Utc>),
    Text(String),
}

impl From<DateTime<Utc>> for TimePoint {
    fn from(value: DateTime<Utc>) -> Self {
        TimePoint::Absolute(value)
    }
}

impl From<&str> for TimePoint {
    fn from(value: &str) -> Self {
        TimePoint::Text(value.to_string())
    }
}

impl From<String> for TimePoint {
    fn from(value: String) -> Self {
        TimePoint::Text(value)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePoint::Absolute(dt) => write!(f, "{}", dt.format(DISPLAY_FORMAT)),
            TimePoint::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Unresolved time range as edited by the user.
///
/// Immutable once constructed; every edit produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTimeRange {
    pub from: TimePoint,
    pub to: TimePoint,
}

impl RawTimeRange {
    pub fn new(from: impl Into<TimePoint>, to: impl Into<TimePoint>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A resolved instant. Valid by construction: it can only be built from a
/// parsed `DateTime`, never from a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Moment(DateTime<Utc>);

impl Moment {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_before(&self, other: &Moment) -> bool {
        self.0 < other.0
    }

    pub fn is_same(&self, other: &Moment) -> bool {
        self.0 == other.0
    }

    /// Render in the given zone using the range-field display format.
    pub fn format_in(&self, zone: Tz) -> String {
        self.0
            .with_timezone(&zone)
            .format(DISPLAY_FORMAT)
            .to_string()
    }
}

impl From<DateTime<Utc>> for Moment {
    fn from(value: DateTime<Utc>) -> Self {
        Moment::new(value)
    }
}

/// Both ends resolved to concrete instants.
///
/// `from <= to` is deliberately not enforced here; an inverted range is
/// representable and the validator flags it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTimeRange {
    pub from: Moment,
    pub to: Moment,
    /// The raw value this range was resolved from, kept so the picker can
    /// re-resolve relative expressions later.
    pub raw: RawTimeRange,
}

impl ResolvedTimeRange {
    pub fn is_ordered(&self) -> bool {
        !self.to.is_before(&self.from)
    }
}
