use super::args::{Cli, Commands, LogsCommand, RangeCommand};
use super::handlers;
use crate::config::Config;
use anyhow::Result;
use logspan_engine::{ResolveContext, WeekStart};
use logspan_types::{DedupStrategy, SortOrder};

pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // CLI flags win over config values, config over built-in defaults.
    let zone = cli.timezone.clone().or_else(|| config.timezone.clone());
    let fiscal_year_start = cli
        .fiscal_year_start
        .unwrap_or(config.fiscal_year_start_month);
    let week_start = cli
        .week_start
        .map(WeekStart::from)
        .unwrap_or(config.week_start);
    let ctx = ResolveContext::from_parts(zone.as_deref(), Some(fiscal_year_start), week_start)?;

    match cli.command {
        Commands::Range { command } => match command {
            RangeCommand::Resolve { from, to, format } => {
                handlers::range_resolve::handle(&from, &to, &ctx, format)
            }
            RangeCommand::Validate { from, to, format } => {
                handlers::range_validate::handle(&from, &to, &ctx, format)
            }
            RangeCommand::Describe { from, to } => handlers::range_describe::handle(&from, &to),
            RangeCommand::Quick { format } => handlers::range_quick::handle(format),
        },

        Commands::Logs { command } => match command {
            LogsCommand::Dedupe {
                input,
                strategy,
                format,
                sort,
                limit,
            } => {
                let strategy = strategy
                    .map(DedupStrategy::from)
                    .unwrap_or(config.default_dedup_strategy);
                handlers::logs_dedupe::handle(&input, strategy, format, sort.map(SortOrder::from), limit)
            }
            LogsCommand::Stats { input, format } => handlers::logs_stats::handle(&input, format),
        },

        Commands::Init { force } => handlers::init::handle(cli.config.as_deref(), force),
    }
}
