use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar unit used by relative time expressions.
///
/// Tokens follow the expression grammar: lowercase `m` is minutes,
/// uppercase `M` is months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
    Quarter,
}

impl TimeUnit {
    /// Single-letter token as written in expressions.
    pub fn token(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "m",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Week => "w",
            TimeUnit::Month => "M",
            TimeUnit::Year => "y",
            TimeUnit::Quarter => "Q",
        }
    }

    pub fn from_token(token: &str) -> Option<TimeUnit> {
        match token {
            "s" => Some(TimeUnit::Second),
            "m" => Some(TimeUnit::Minute),
            "h" => Some(TimeUnit::Hour),
            "d" => Some(TimeUnit::Day),
            "w" => Some(TimeUnit::Week),
            "M" => Some(TimeUnit::Month),
            "y" => Some(TimeUnit::Year),
            "Q" => Some(TimeUnit::Quarter),
            _ => None,
        }
    }

    /// English name, pluralized for counts other than one.
    pub fn label(&self, count: i64) -> String {
        let singular = match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
            TimeUnit::Quarter => "quarter",
        };
        if count == 1 {
            singular.to_string()
        } else {
            format!("{}s", singular)
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Unit together with its fiscal qualifier.
///
/// The fiscal variants `fy` and `fQ` shift year/quarter boundaries to the
/// configured fiscal start month; they exist only for years and quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub unit: TimeUnit,
    pub fiscal: bool,
}

impl UnitSpec {
    pub fn plain(unit: TimeUnit) -> Self {
        Self {
            unit,
            fiscal: false,
        }
    }

    /// Parse a grammar token: `fy`, `fQ`, or a single unit letter.
    pub fn parse_token(token: &str) -> Option<UnitSpec> {
        match token {
            "fy" => Some(UnitSpec {
                unit: TimeUnit::Year,
                fiscal: true,
            }),
            "fQ" => Some(UnitSpec {
                unit: TimeUnit::Quarter,
                fiscal: true,
            }),
            other => TimeUnit::from_token(other).map(UnitSpec::plain),
        }
    }
}

impl fmt::Display for UnitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fiscal {
            write!(f, "f{}", self.unit.token())
        } else {
            write!(f, "{}", self.unit.token())
        }
    }
}
