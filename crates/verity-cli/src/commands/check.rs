//! Check command implementation.

use crate::cli::CheckArgs;
use crate::commands::open_store;
use crate::config::VerityConfig;
use crate::error::Result;
use crate::output::Formatter;
use std::sync::{Arc, Mutex};
use verity_domain::traits::Reasoner;
use verity_domain::ReasoningContext;
use verity_pipeline::DecisionPipeline;
use verity_store::TermHashEmbedder;

/// Execute the check command.
///
/// `reasoner` is built by the caller outside the async runtime; `None`
/// limits the check to the corpus.
pub async fn execute_check(
    args: CheckArgs,
    config: &VerityConfig,
    reasoner: Option<Arc<dyn Reasoner>>,
    formatter: &Formatter,
) -> Result<()> {
    let store = open_store(config)?;
    let mut pipeline = DecisionPipeline::new(
        Arc::new(Mutex::new(store)),
        TermHashEmbedder::default(),
        config.pipeline.clone(),
        config.dedup.clone(),
    )?;
    if let Some(reasoner) = reasoner {
        pipeline = pipeline.with_reasoner(reasoner);
    }

    let context = ReasoningContext {
        image_url: args.image_url.clone(),
        source_url: args.source_url.clone(),
        ..Default::default()
    };
    let verification = pipeline.verify_with_context(&args.text(), context).await?;

    println!("{}", formatter.format_verification(&verification)?);
    Ok(())
}
