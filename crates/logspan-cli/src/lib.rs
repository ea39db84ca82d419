// NOTE: logspan layering
//
// types  - schemas only (ranges, rows, statuses); no clock reads, no IO
// engine - pure functions over those schemas; "now" is always a parameter
//          so both ends of a range resolve against one snapshot
// cli    - argument parsing, config, ingest and presentation; the only
//          layer that samples the system clock or touches the filesystem

mod args;
mod commands;
pub mod config;
mod handlers;
pub mod ingest;
pub mod presentation;
pub mod types;

pub use args::{Cli, Commands, LogsCommand, RangeCommand};
pub use commands::run;
