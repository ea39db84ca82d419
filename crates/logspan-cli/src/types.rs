use clap::ValueEnum;
use logspan_engine::WeekStart;
use logspan_types::{DedupStrategy, SortOrder};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum LogOutputFormat {
    Plain,
    Json,
    Csv,
}

impl fmt::Display for LogOutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOutputFormat::Plain => write!(f, "plain"),
            LogOutputFormat::Json => write!(f, "json"),
            LogOutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum DedupStrategyArg {
    None,
    Exact,
    Numbers,
    Signature,
}

impl fmt::Display for DedupStrategyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupStrategyArg::None => write!(f, "none"),
            DedupStrategyArg::Exact => write!(f, "exact"),
            DedupStrategyArg::Numbers => write!(f, "numbers"),
            DedupStrategyArg::Signature => write!(f, "signature"),
        }
    }
}

impl From<DedupStrategyArg> for DedupStrategy {
    fn from(arg: DedupStrategyArg) -> Self {
        match arg {
            DedupStrategyArg::None => DedupStrategy::None,
            DedupStrategyArg::Exact => DedupStrategy::Exact,
            DedupStrategyArg::Numbers => DedupStrategy::Numbers,
            DedupStrategyArg::Signature => DedupStrategy::Signature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum SortOrderArg {
    Ascending,
    Descending,
}

impl fmt::Display for SortOrderArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrderArg::Ascending => write!(f, "ascending"),
            SortOrderArg::Descending => write!(f, "descending"),
        }
    }
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Ascending => SortOrder::Ascending,
            SortOrderArg::Descending => SortOrder::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum WeekStartArg {
    Monday,
    Sunday,
}

impl fmt::Display for WeekStartArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStartArg::Monday => write!(f, "monday"),
            WeekStartArg::Sunday => write!(f, "sunday"),
        }
    }
}

impl From<WeekStartArg> for WeekStart {
    fn from(arg: WeekStartArg) -> Self {
        match arg {
            WeekStartArg::Monday => WeekStart::Monday,
            WeekStartArg::Sunday => WeekStart::Sunday,
        }
    }
}
