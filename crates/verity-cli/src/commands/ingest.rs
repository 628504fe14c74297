//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::commands::{file_sources, open_store};
use crate::config::VerityConfig;
use crate::error::Result;
use crate::output::Formatter;
use verity_ingest::Ingestor;
use verity_store::TermHashEmbedder;

/// Execute the ingest command.
pub async fn execute_ingest(
    args: IngestArgs,
    config: &VerityConfig,
    formatter: &Formatter,
) -> Result<()> {
    let mut dedup = config.dedup.clone();
    if args.dedupe_within_batch {
        dedup.dedupe_within_batch = true;
    }

    let mut store = open_store(config)?;
    let mut ingestor = Ingestor::new(TermHashEmbedder::default(), config.ingest.clone(), dedup)?;
    let sources = file_sources(&args.files);

    let runs = ingestor.ingest_all(&mut store, &sources).await;

    println!("{}", formatter.format_runs(&runs)?);
    eprintln!("{}", formatter.ingest_summary(&runs));
    Ok(())
}
