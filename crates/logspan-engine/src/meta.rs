use logspan_types::{DedupStrategy, Labels, LogRow, MetaItem, MetaValue};

use crate::dedup::dedup_count;

/// Longest entry the highlighter downstream will process; longer lines get
/// a meta notice instead of failing silently.
pub const MAX_CHARACTERS: usize = 100_000;

/// Labels present with the same value on every row. Empty when any row has
/// no labels at all.
pub fn common_labels(rows: &[LogRow]) -> Labels {
    let mut rows_iter = rows.iter();
    let mut common = match rows_iter.next() {
        Some(first) => first.labels.clone(),
        None => return Labels::new(),
    };
    for row in rows_iter {
        common.retain(|key, value| row.labels.get(key) == Some(value));
        if common.is_empty() {
            break;
        }
    }
    common
}

/// Attach `unique_labels` (labels minus the common set) to each row.
/// Returns whether any row ended up with unique labels.
pub fn apply_unique_labels(rows: &mut [LogRow], common: &Labels) -> bool {
    let mut has_unique = false;
    for row in rows.iter_mut() {
        let unique: Labels = row
            .labels
            .iter()
            .filter(|(key, value)| common.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if !unique.is_empty() {
            has_unique = true;
        }
        row.unique_labels = Some(unique);
    }
    has_unique
}

/// Summary items shown above a log panel: common labels, the dedup count
/// when a strategy is active, and a notice for oversized entries.
pub fn collect_meta(rows: &[LogRow], strategy: DedupStrategy) -> Vec<MetaItem> {
    let mut meta = Vec::new();

    let common = common_labels(rows);
    if !common.is_empty() {
        meta.push(MetaItem {
            label: "Common labels".to_string(),
            value: MetaValue::Labels(common),
        });
    }

    if strategy != DedupStrategy::None {
        meta.push(MetaItem {
            label: "Dedup count".to_string(),
            value: MetaValue::Number(dedup_count(rows)),
        });
    }

    if rows.iter().any(|row| row.entry.len() > MAX_CHARACTERS) {
        meta.push(MetaItem {
            label: "Info".to_string(),
            value: MetaValue::Text(
                "Logs with more than 100,000 characters could not be parsed and highlighted"
                    .to_string(),
            ),
        });
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::dedup_rows;
    use logspan_types::LogLevel;

    fn row(entry: &str, labels: &[(&str, &str)]) -> LogRow {
        LogRow {
            uid: entry.to_string(),
            entry: entry.to_string(),
            timestamp: None,
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            level: LogLevel::Unknown,
            duplicates: None,
            unique_labels: None,
        }
    }

    #[test]
    fn test_common_labels_intersect_across_rows() {
        let rows = vec![
            row("a", &[("app", "api"), ("env", "prod"), ("pod", "x")]),
            row("b", &[("app", "api"), ("env", "prod"), ("pod", "y")]),
        ];
        let common = common_labels(&rows);
        assert_eq!(common.len(), 2);
        assert_eq!(common.get("app").map(String::as_str), Some("api"));
        assert_eq!(common.get("pod"), None);
    }

    #[test]
    fn test_common_labels_empty_when_a_row_has_none() {
        let rows = vec![row("a", &[("app", "api")]), row("b", &[])];
        assert!(common_labels(&rows).is_empty());
    }

    #[test]
    fn test_unique_labels_exclude_the_common_set() {
        let mut rows = vec![
            row("a", &[("app", "api"), ("pod", "x")]),
            row("b", &[("app", "api"), ("pod", "y")]),
        ];
        let common = common_labels(&rows);
        let has_unique = apply_unique_labels(&mut rows, &common);
        assert!(has_unique);
        assert_eq!(
            rows[0].unique_labels.as_ref().unwrap().get("pod").unwrap(),
            "x"
        );
        assert!(!rows[0].unique_labels.as_ref().unwrap().contains_key("app"));
    }

    #[test]
    fn test_meta_includes_dedup_count_only_when_active() {
        let deduped = dedup_rows(
            &[row("same", &[]), row("same", &[])],
            DedupStrategy::Exact,
        );
        let meta = collect_meta(&deduped, DedupStrategy::Exact);
        assert!(
            meta.iter()
                .any(|item| item.label == "Dedup count" && item.value == MetaValue::Number(1))
        );

        let plain = collect_meta(&deduped, DedupStrategy::None);
        assert!(plain.iter().all(|item| item.label != "Dedup count"));
    }

    #[test]
    fn test_meta_flags_oversized_entries() {
        let big = "x".repeat(MAX_CHARACTERS + 1);
        let rows = vec![row(&big, &[])];
        let meta = collect_meta(&rows, DedupStrategy::None);
        assert!(meta.iter().any(|item| item.label == "Info"));
    }

    #[test]
    fn test_meta_empty_for_plain_batch() {
        let rows = vec![row("a", &[]), row("b", &[])];
        assert!(collect_meta(&rows, DedupStrategy::None).is_empty());
    }
}
