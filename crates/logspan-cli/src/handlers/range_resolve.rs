use crate::presentation;
use crate::types::OutputFormat;
use anyhow::Result;
use logspan_engine::{Clock, ResolveContext, SystemClock, convert_raw_to_range};
use logspan_types::RawTimeRange;

pub fn handle(from: &str, to: &str, ctx: &ResolveContext, format: OutputFormat) -> Result<()> {
    let raw = RawTimeRange::new(from, to);
    // One snapshot for both ends.
    let now = SystemClock.now();
    let range = convert_raw_to_range(&raw, now, ctx)?;

    match format {
        OutputFormat::Plain => presentation::range::print_resolved(&range, ctx),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&range)?),
    }

    Ok(())
}
