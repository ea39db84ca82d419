use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::ingest;
use crate::presentation::time::{format_relative, format_span};
use crate::types::OutputFormat;
use logspan_engine::{Clock, SystemClock, common_labels};
use logspan_types::{LogLevel, MetaValue};

const LEVELS: [LogLevel; 7] = [
    LogLevel::Critical,
    LogLevel::Error,
    LogLevel::Warning,
    LogLevel::Info,
    LogLevel::Debug,
    LogLevel::Trace,
    LogLevel::Unknown,
];

pub fn handle(input: &Path, format: OutputFormat) -> Result<()> {
    let rows = ingest::load_rows(input)?;

    let counts: Vec<(LogLevel, usize)> = LEVELS
        .iter()
        .map(|level| (*level, rows.iter().filter(|r| r.level == *level).count()))
        .collect();
    let common = common_labels(&rows);
    let first = rows.iter().filter_map(|r| r.timestamp).min();
    let last = rows.iter().filter_map(|r| r.timestamp).max();

    match format {
        OutputFormat::Plain => {
            println!("Rows: {}", rows.len());
            if let (Some(first), Some(last)) = (first, last) {
                let now = SystemClock.now();
                println!(
                    "Span: {} .. {} ({}, spanning {})",
                    first.format("%Y-%m-%d %H:%M:%S"),
                    last.format("%Y-%m-%d %H:%M:%S"),
                    format_relative(last, now),
                    format_span(last - first),
                );
            }
            let levels = counts
                .iter()
                .filter(|(_, count)| *count > 0)
                .map(|(level, count)| format!("{}={}", level, count))
                .collect::<Vec<_>>()
                .join(" ");
            if !levels.is_empty() {
                println!("Levels: {}", levels);
            }
            if !common.is_empty() {
                println!("Common labels: {}", MetaValue::Labels(common));
            }
        }
        OutputFormat::Json => {
            let levels: serde_json::Map<String, serde_json::Value> = counts
                .iter()
                .map(|(level, count)| (level.to_string(), json!(count)))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "rows": rows.len(),
                    "levels": levels,
                    "first": first,
                    "last": last,
                    "common_labels": common,
                }))?
            );
        }
    }

    Ok(())
}
