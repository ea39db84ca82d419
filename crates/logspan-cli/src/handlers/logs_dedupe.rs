use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::ingest;
use crate::presentation;
use crate::types::LogOutputFormat;
use logspan_engine::{apply_unique_labels, collect_meta, common_labels, dedup_rows, sort_rows};
use logspan_types::{DedupStrategy, SortOrder};

pub fn handle(
    input: &Path,
    strategy: DedupStrategy,
    format: LogOutputFormat,
    sort: Option<SortOrder>,
    limit: Option<usize>,
) -> Result<()> {
    let mut rows = ingest::load_rows(input)?;
    if let Some(order) = sort {
        sort_rows(&mut rows, order);
    }
    let mut deduped = dedup_rows(&rows, strategy);

    let common = common_labels(&deduped);
    if !common.is_empty() {
        apply_unique_labels(&mut deduped, &common);
    }

    // Meta covers the whole batch; the limit only trims what is printed.
    let meta = collect_meta(&deduped, strategy);
    if let Some(limit) = limit {
        deduped.truncate(limit);
    }

    match format {
        LogOutputFormat::Plain => presentation::logs::print_rows(&deduped, &meta),
        LogOutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "meta": meta, "rows": deduped }))?
        ),
        LogOutputFormat::Csv => presentation::logs::write_csv(&deduped, std::io::stdout().lock())?,
    }

    Ok(())
}
