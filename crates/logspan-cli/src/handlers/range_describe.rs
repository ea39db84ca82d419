use anyhow::Result;
use logspan_engine::describe_range;
use logspan_types::RawTimeRange;

pub fn handle(from: &str, to: &str) -> Result<()> {
    let raw = RawTimeRange::new(from, to);
    println!("{}", describe_range(&raw));
    Ok(())
}
