use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use logspan_types::{Labels, LogLevel, LogRow};

/// Fixed instant used across tests: 2024-03-15 10:00:00 UTC.
pub fn reference_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
        .expect("reference instant must parse")
        .with_timezone(&Utc)
}

/// Builder for log rows in tests.
pub struct LogRowBuilder {
    row: LogRow,
}

impl LogRowBuilder {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            row: LogRow {
                uid: Uuid::new_v4().to_string(),
                entry: entry.into(),
                timestamp: None,
                labels: Labels::new(),
                level: LogLevel::Unknown,
                duplicates: None,
                unique_labels: None,
            },
        }
    }

    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.row.uid = uid.into();
        self
    }

    pub fn timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.row.timestamp = Some(ts);
        self
    }

    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.row.labels.insert(key.into(), value.into());
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.row.level = level;
        self
    }

    pub fn build(self) -> LogRow {
        self.row
    }
}

/// Small batch with a duplicate run, mixed levels, and shared labels.
pub fn sample_batch() -> Vec<LogRow> {
    let base = reference_now();
    vec![
        LogRowBuilder::new("error: connection refused from 10.0.0.1")
            .uid("row-1")
            .timestamp(base)
            .label("app", "api")
            .label("pod", "api-0")
            .level(LogLevel::Error)
            .build(),
        LogRowBuilder::new("error: connection refused from 10.0.0.2")
            .uid("row-2")
            .timestamp(base + chrono::Duration::seconds(1))
            .label("app", "api")
            .label("pod", "api-1")
            .level(LogLevel::Error)
            .build(),
        LogRowBuilder::new("info: listener restarted")
            .uid("row-3")
            .timestamp(base + chrono::Duration::seconds(2))
            .label("app", "api")
            .label("pod", "api-0")
            .level(LogLevel::Info)
            .build(),
    ]
}

/// Write rows as JSONL into `dir`, one JSON object per line.
pub fn write_jsonl(dir: &Path, name: &str, rows: &[LogRow]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::new();
    for row in rows {
        body.push_str(&serde_json::to_string(row).expect("row must serialize"));
        body.push('\n');
    }
    fs::write(&path, body).expect("fixture file must be writable");
    path
}

/// Write raw text lines into `dir` as a plain log file.
pub fn write_plain_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).expect("fixture file must be writable");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sample_batch_shares_app_label() {
        let batch = sample_batch();
        assert_eq!(batch.len(), 3);
        assert!(
            batch
                .iter()
                .all(|row| row.labels.get("app").map(String::as_str) == Some("api"))
        );
    }

    #[test]
    fn test_write_jsonl_produces_one_line_per_row() {
        let dir = TempDir::new().unwrap();
        let path = write_jsonl(dir.path(), "rows.jsonl", &sample_batch());
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
