use std::io;

use anyhow::Result;
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use logspan_types::{LogLevel, LogRow, MetaItem};

const TIME_COLUMN: &str = "%Y-%m-%d %H:%M:%S";

pub fn print_meta(meta: &[MetaItem]) {
    for item in meta {
        println!("{}: {}", item.label.bold(), item.value);
    }
}

pub fn print_rows(rows: &[LogRow], meta: &[MetaItem]) {
    if !meta.is_empty() {
        print_meta(meta);
        println!();
    }

    let tty = io::stdout().is_terminal();
    let width = if tty {
        terminal_size::terminal_size().map(|(w, _)| w.0 as usize)
    } else {
        None
    };

    for row in rows {
        let time = row
            .timestamp
            .map(|ts| ts.format(TIME_COLUMN).to_string())
            .unwrap_or_else(|| format!("{:<19}", "-"));
        let repeats = row
            .duplicates
            .filter(|count| *count > 0)
            .map(|count| format!(" (x{})", count + 1))
            .unwrap_or_default();

        // Only the entry is truncated; the fixed columns stay intact.
        let prefix_len = time.len() + 2 + 8 + 2;
        let entry = match width {
            Some(width) if width > prefix_len + repeats.len() + 3 => {
                truncate(&row.entry, width - prefix_len - repeats.len())
            }
            Some(_) => truncate(&row.entry, 40),
            None => row.entry.clone(),
        };

        println!(
            "{}  {}  {}{}",
            time,
            colored_level(row.level, tty),
            entry,
            repeats
        );
    }
}

fn colored_level(level: LogLevel, tty: bool) -> String {
    let padded = format!("{:<8}", level.to_string());
    if !tty {
        return padded;
    }
    match level {
        LogLevel::Critical => padded.red().bold().to_string(),
        LogLevel::Error => padded.red().to_string(),
        LogLevel::Warning => padded.yellow().to_string(),
        LogLevel::Info => padded.green().to_string(),
        LogLevel::Debug => padded.blue().to_string(),
        LogLevel::Trace => padded.dimmed().to_string(),
        LogLevel::Unknown => padded,
    }
}

fn truncate(entry: &str, max: usize) -> String {
    if entry.chars().count() <= max {
        entry.to_string()
    } else {
        entry.chars().take(max.saturating_sub(3)).collect::<String>() + "..."
    }
}

/// Write rows as CSV, one record per retained row.
pub fn write_csv(rows: &[LogRow], out: impl io::Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["uid", "timestamp", "level", "duplicates", "entry", "labels"])?;

    for row in rows {
        let labels = row
            .labels
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(" ");
        writer.write_record([
            row.uid.clone(),
            row.timestamp.map(|ts| ts.to_rfc3339()).unwrap_or_default(),
            row.level.to_string(),
            row.duplicates.map(|d| d.to_string()).unwrap_or_default(),
            row.entry.clone(),
            labels,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logspan_types::Labels;

    fn row(entry: &str, duplicates: Option<u64>) -> LogRow {
        LogRow {
            uid: "row-1".to_string(),
            entry: entry.to_string(),
            timestamp: None,
            labels: Labels::new(),
            level: LogLevel::Error,
            duplicates,
            unique_labels: None,
        }
    }

    #[test]
    fn test_truncate_keeps_short_entries() {
        assert_eq!(truncate("short", 40), "short");
    }

    #[test]
    fn test_truncate_marks_long_entries() {
        let long = "x".repeat(50);
        let cut = truncate(&long, 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_csv_includes_duplicate_counts() {
        let mut buffer = Vec::new();
        write_csv(&[row("error: boom", Some(2))], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "uid,timestamp,level,duplicates,entry,labels"
        );
        assert_eq!(lines.next().unwrap(), "row-1,,error,2,error: boom,");
    }
}
