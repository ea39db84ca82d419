use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use walkdir::WalkDir;

use logspan_engine::detect_level;
use logspan_types::{Labels, LogLevel, LogRow};

const LOG_EXTENSIONS: &[&str] = &["jsonl", "ndjson", "log", "txt"];

/// Loose input schema for JSONL rows. Field spellings from common shippers
/// are accepted; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(alias = "message", alias = "line")]
    entry: String,

    #[serde(default, alias = "time", alias = "ts")]
    timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    labels: Labels,

    #[serde(default)]
    level: Option<String>,

    #[serde(default)]
    uid: Option<String>,
}

/// Load rows from a log file, or from every log file under a directory.
/// Directory entries are visited in sorted order so batches are stable.
pub fn load_rows(input: &Path) -> Result<Vec<LogRow>> {
    let files = collect_files(input)?;
    if files.is_empty() {
        bail!("no log files found under {}", input.display());
    }

    let mut rows = Vec::new();
    for file in &files {
        read_file(file, &mut rows)?;
    }
    Ok(rows)
}

fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("{} does not exist", input.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| LOG_EXTENSIONS.contains(&ext))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_file(path: &Path, rows: &mut Vec<LogRow>) -> Result<()> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line =
            line.with_context(|| format!("cannot read {}:{}", path.display(), index + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        rows.push(parse_line(trimmed));
    }
    Ok(())
}

/// JSON object lines become structured rows; anything else is kept as a
/// plain entry. Rows without a usable level get one detected from the line.
fn parse_line(line: &str) -> LogRow {
    if line.starts_with('{') {
        if let Ok(raw) = serde_json::from_str::<RawLine>(line) {
            let level = raw
                .level
                .as_deref()
                .and_then(LogLevel::from_alias)
                .unwrap_or_else(|| detect_level(&raw.entry));
            return LogRow {
                uid: raw.uid.unwrap_or_else(|| Uuid::new_v4().to_string()),
                entry: raw.entry,
                timestamp: raw.timestamp,
                labels: raw.labels,
                level,
                duplicates: None,
                unique_labels: None,
            };
        }
    }

    LogRow {
        uid: Uuid::new_v4().to_string(),
        entry: line.to_string(),
        timestamp: None,
        labels: Labels::new(),
        level: detect_level(line),
        duplicates: None,
        unique_labels: None,
    }
}
