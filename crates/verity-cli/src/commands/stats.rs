//! Stats command implementation.

use crate::cli::StatsArgs;
use crate::commands::open_store;
use crate::config::VerityConfig;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the stats command.
pub async fn execute_stats(
    args: StatsArgs,
    config: &VerityConfig,
    formatter: &Formatter,
) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;
    let runs = store.recent_ingest_runs(args.runs)?;

    println!("{}", formatter.format_stats(&stats)?);
    if args.runs > 0 {
        println!("{}", formatter.format_runs(&runs)?);
    }
    Ok(())
}
