use crate::types::OutputFormat;
use anyhow::Result;
use logspan_engine::QUICK_RANGES;

pub fn handle(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for range in QUICK_RANGES {
                println!("{:<12} {:<12} {}", range.from, range.to, range.display);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(QUICK_RANGES)?),
    }
    Ok(())
}
