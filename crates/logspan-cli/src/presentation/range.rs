use owo_colors::OwoColorize;

use logspan_engine::ResolveContext;
use logspan_types::{InputState, RangeValidation, ResolvedTimeRange};

pub fn print_resolved(range: &ResolvedTimeRange, ctx: &ResolveContext) {
    println!(
        "From: {}  ({})",
        range.from.format_in(ctx.zone),
        range.from.utc().to_rfc3339()
    );
    println!(
        "To:   {}  ({})",
        range.to.format_in(ctx.zone),
        range.to.utc().to_rfc3339()
    );
    println!("Zone: {}", ctx.zone);
}

pub fn print_validation(validation: &RangeValidation) {
    print_field("From:", &validation.from);
    print_field("To:  ", &validation.to);
}

fn print_field(label: &str, state: &InputState) {
    match state.status.message() {
        None => println!("{} {}  {}", label, state.value, "valid".green()),
        Some(message) => println!("{} {}  {}", label, state.value, message.red()),
    }
}
