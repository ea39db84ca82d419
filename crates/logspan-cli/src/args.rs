use crate::types::{DedupStrategyArg, LogOutputFormat, OutputFormat, SortOrderArg, WeekStartArg};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logspan")]
#[command(about = "Resolve dashboard time ranges and deduplicate log batches", long_about = None)]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// IANA time zone for calendar boundaries (falls back to config, then UTC)
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// 0-based month the fiscal year starts in (0 = January)
    #[arg(long, global = true)]
    pub fiscal_year_start: Option<u32>,

    /// Day that begins a week for /w rounding
    #[arg(long, global = true)]
    pub week_start: Option<WeekStartArg>,

    /// Config file path (defaults to the workspace data dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve, validate and describe time ranges
    Range {
        #[command(subcommand)]
        command: RangeCommand,
    },

    /// Deduplicate and summarize log batches
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum RangeCommand {
    /// Resolve both ends of a range to concrete instants
    Resolve {
        /// Range start: relative expression, timestamp, or epoch millis
        #[arg(long)]
        from: String,

        /// Range end, same forms as --from
        #[arg(long)]
        to: String,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },

    /// Validate both fields the way the picker form does
    Validate {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },

    /// Print a human-readable description of a raw range
    Describe {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// List the quick-range catalog
    Quick {
        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum LogsCommand {
    /// Collapse consecutive duplicate rows
    Dedupe {
        /// Log file, or directory of .jsonl/.ndjson/.log/.txt files
        input: PathBuf,

        /// Comparison strategy (falls back to config, then none)
        #[arg(long)]
        strategy: Option<DedupStrategyArg>,

        #[arg(long, default_value = "plain")]
        format: LogOutputFormat,

        /// Sort rows by timestamp before deduplicating
        #[arg(long)]
        sort: Option<SortOrderArg>,

        /// Keep at most this many rows in the output
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Row, level and label summary for a log batch
    Stats {
        /// Log file, or directory of .jsonl/.ndjson/.log/.txt files
        input: PathBuf,

        #[arg(long, default_value = "plain")]
        format: OutputFormat,
    },
}
