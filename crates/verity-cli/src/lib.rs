//! Verity CLI library.
//!
//! Configuration loading, reasoner construction, command execution and
//! output formatting for the `verity` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::VerityConfig;
pub use error::{CliError, Result};
pub use output::Formatter;

use std::sync::Arc;
use tracing::{info, warn};
use verity_domain::traits::Reasoner;
use verity_reasoner::ModelChain;

/// Build the reasoner model chain, if one can be used
///
/// Returns `None` when the reasoner is disabled or no API key is set. Must
/// be called outside the async runtime: providers own blocking HTTP clients.
pub fn build_reasoner(config: &VerityConfig) -> Result<Option<Arc<dyn Reasoner>>> {
    if !config.pipeline.reasoner_enabled {
        return Ok(None);
    }
    let Some(api_key) = config.api_key.as_deref() else {
        warn!(
            "{} not set, checks will use the corpus only",
            crate::config::API_KEY_ENV
        );
        return Ok(None);
    };

    let chain = ModelChain::from_config(&config.reasoner, api_key)?;
    info!(models = ?chain.models(), "Reasoner configured");
    Ok(Some(Arc::new(chain)))
}

/// Execute a parsed command
pub async fn run(
    cli: Cli,
    config: VerityConfig,
    reasoner: Option<Arc<dyn Reasoner>>,
) -> Result<()> {
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.output.format);
    let formatter = Formatter::new(format, !cli.no_color && config.output.color);

    match cli.command {
        Command::Check(args) => commands::execute_check(args, &config, reasoner, &formatter).await,
        Command::Ingest(args) => commands::execute_ingest(args, &config, &formatter).await,
        Command::Watch(args) => commands::execute_watch(args, &config, &formatter).await,
        Command::Stats(args) => commands::execute_stats(args, &config, &formatter).await,
        Command::Domains(command) => {
            commands::execute_domains(command, &config, &formatter).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reasoner_without_key() {
        let config = VerityConfig::default();
        assert!(build_reasoner(&config).unwrap().is_none());
    }

    #[test]
    fn test_no_reasoner_when_disabled() {
        let mut config = VerityConfig::default();
        config.api_key = Some("key".to_string());
        config.pipeline.reasoner_enabled = false;
        assert!(build_reasoner(&config).unwrap().is_none());
    }
}
