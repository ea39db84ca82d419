use crate::presentation;
use crate::types::OutputFormat;
use anyhow::Result;
use logspan_engine::{Clock, ResolveContext, SystemClock, validate_range};
use logspan_types::RawTimeRange;

pub fn handle(from: &str, to: &str, ctx: &ResolveContext, format: OutputFormat) -> Result<()> {
    let raw = RawTimeRange::new(from, to);
    let now = SystemClock.now();
    let validation = validate_range(&raw, now, ctx);

    match format {
        OutputFormat::Plain => presentation::range::print_validation(&validation),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&validation)?),
    }

    // Scripting contract: invalid fields exit non-zero after printing.
    if !validation.is_valid() {
        std::process::exit(1);
    }

    Ok(())
}
