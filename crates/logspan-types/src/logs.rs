use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label set attached to a log row. Ordered so serialized output is stable.
pub type Labels = BTreeMap<String, String>;

/// Canonical log severity.
///
/// Provider spellings are reduced to this set to limit color variation;
/// see [`LogLevel::ALIASES`] for the mapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
    #[default]
    Unknown,
}

impl LogLevel {
    /// Raw provider spellings mapped to canonical levels.
    pub const ALIASES: &'static [(&'static str, LogLevel)] = &[
        ("emerg", LogLevel::Critical),
        ("fatal", LogLevel::Critical),
        ("alert", LogLevel::Critical),
        ("critical", LogLevel::Critical),
        ("crit", LogLevel::Critical),
        ("warning", LogLevel::Warning),
        ("warn", LogLevel::Warning),
        ("error", LogLevel::Error),
        ("eror", LogLevel::Error),
        ("err", LogLevel::Error),
        ("informational", LogLevel::Info),
        ("information", LogLevel::Info),
        ("info", LogLevel::Info),
        ("notice", LogLevel::Info),
        ("debug", LogLevel::Debug),
        ("dbug", LogLevel::Debug),
        ("trace", LogLevel::Trace),
    ];

    /// Canonical level for a raw spelling, case-insensitive.
    pub fn from_alias(alias: &str) -> Option<LogLevel> {
        Self::ALIASES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(alias))
            .map(|(_, level)| *level)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
            LogLevel::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Normalization rule applied before comparing two consecutive log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DedupStrategy {
    /// Keep every row.
    #[default]
    None,
    /// Compare entries with ISO-8601 datetimes stripped.
    Exact,
    /// Compare entries with every digit stripped.
    Numbers,
    /// Compare only punctuation and whitespace shape.
    Signature,
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DedupStrategy::None => "none",
            DedupStrategy::Exact => "exact",
            DedupStrategy::Numbers => "numbers",
            DedupStrategy::Signature => "signature",
        };
        write!(f, "{}", name)
    }
}

/// Sort order for log rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

/// Single log line with its parsed metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    /// Stable row identity, assigned at ingest when the source has none.
    pub uid: String,

    /// Raw log line.
    pub entry: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,

    #[serde(default)]
    pub level: LogLevel,

    /// Number of following identical rows collapsed into this one.
    /// `None` until a dedup pass has run; the first row of a run gets 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<u64>,

    /// Labels not shared by every row in the batch. Filled by meta
    /// aggregation when common labels exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_labels: Option<Labels>,
}

/// One entry of the summary shown above a log panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaItem {
    pub label: String,
    pub value: MetaValue,
}

/// Value of a meta item. The kind travels with the value so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum MetaValue {
    Number(u64),
    Text(String),
    Labels(Labels),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Number(n) => write!(f, "{}", n),
            MetaValue::Text(text) => write!(f, "{}", text),
            MetaValue::Labels(labels) => {
                let rendered = labels
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "{}", rendered)
            }
        }
    }
}
