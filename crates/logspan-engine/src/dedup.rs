use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use logspan_types::{DedupStrategy, LogRow, SortOrder};

// Timestamps change on every line even when the message repeats, so entries
// are compared with ISO-8601 datetimes removed.
static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?")
        .expect("datetime pattern must compile")
});

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").expect("digit pattern must compile"));

static WORD_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w").expect("word pattern must compile"));

fn normalized<'a>(entry: &'a str, strategy: DedupStrategy) -> Cow<'a, str> {
    match strategy {
        DedupStrategy::None => Cow::Borrowed(entry),
        DedupStrategy::Exact => ISO_DATETIME.replace_all(entry, ""),
        DedupStrategy::Numbers => DIGITS.replace_all(entry, ""),
        DedupStrategy::Signature => WORD_CHARS.replace_all(entry, ""),
    }
}

fn is_duplicate(entry: &str, retained: &str, strategy: DedupStrategy) -> bool {
    if strategy == DedupStrategy::None {
        return false;
    }
    normalized(entry, strategy) == normalized(retained, strategy)
}

/// Collapse consecutive duplicate rows into the first row of each run.
///
/// Returns a new sequence; the input is untouched. Retained rows carry the
/// count of rows folded into them (first of a run = 0). Non-adjacent
/// duplicates are never merged, and `none` is the identity.
pub fn dedup_rows(rows: &[LogRow], strategy: DedupStrategy) -> Vec<LogRow> {
    if strategy == DedupStrategy::None {
        return rows.to_vec();
    }

    let mut result: Vec<LogRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(retained) = result.last_mut() {
            if is_duplicate(&row.entry, &retained.entry, strategy) {
                *retained.duplicates.get_or_insert(0) += 1;
                continue;
            }
        }
        let mut kept = row.clone();
        kept.duplicates = Some(0);
        result.push(kept);
    }
    result
}

/// Total rows collapsed by a dedup pass, shown in the logs meta line.
pub fn dedup_count(rows: &[LogRow]) -> u64 {
    rows.iter().map(|row| row.duplicates.unwrap_or(0)).sum()
}

/// Order rows by timestamp before display or dedup. Dedup only collapses
/// adjacent rows, so the order chosen here decides what counts as a run.
/// The sort is stable; rows without timestamps keep their relative order.
pub fn sort_rows(rows: &mut [LogRow], order: SortOrder) {
    match order {
        SortOrder::Ascending => rows.sort_by_key(|row| row.timestamp),
        SortOrder::Descending => {
            rows.sort_by_key(|row| std::cmp::Reverse(row.timestamp));
        }
    }
}
