//! Watch command implementation.

use crate::cli::WatchArgs;
use crate::commands::{file_sources, open_store};
use crate::config::VerityConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use verity_ingest::{IngestWorker, Ingestor};
use verity_store::TermHashEmbedder;

/// Execute the watch command.
pub async fn execute_watch(
    args: WatchArgs,
    config: &VerityConfig,
    formatter: &Formatter,
) -> Result<()> {
    let mut ingest = config.ingest.clone();
    if let Some(minutes) = args.interval {
        ingest.interval_minutes = minutes;
    }
    ingest.validate().map_err(CliError::InvalidInput)?;

    let store = open_store(config)?;
    let ingestor = Ingestor::new(TermHashEmbedder::default(), ingest, config.dedup.clone())?;
    let mut worker = IngestWorker::new(ingestor, file_sources(&args.files));

    match args.cycles {
        Some(cycles) => {
            worker.run_cycles(store, cycles).await;
        }
        None => {
            eprintln!("{}", formatter.info("Watching sources, press Ctrl+C to stop"));
            worker.run(store).await;
        }
    }

    let metrics = worker.metrics();
    eprintln!(
        "{}",
        formatter.success(&format!(
            "Stored {} claim(s) over {} cycle(s)",
            metrics.stored, metrics.cycles
        ))
    );
    Ok(())
}
