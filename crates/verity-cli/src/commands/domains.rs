//! Domains command implementation.

use crate::cli::DomainsCommand;
use crate::commands::open_store;
use crate::config::VerityConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use verity_domain::traits::SourceReputation;
use verity_domain::UnreliableDomain;

/// Execute a domains subcommand.
pub async fn execute_domains(
    command: DomainsCommand,
    config: &VerityConfig,
    formatter: &Formatter,
) -> Result<()> {
    let mut store = open_store(config)?;
    match command {
        DomainsCommand::Add {
            domain,
            category,
            reason,
        } => {
            let entry = UnreliableDomain::new(&domain, category, reason);
            if entry.domain.is_empty() {
                return Err(CliError::InvalidInput(format!("Invalid domain '{}'", domain)));
            }
            store.add_unreliable_domain(&entry)?;
            eprintln!(
                "{}",
                formatter.success(&format!("Listed {} as {}", entry.domain, entry.category))
            );
        }
        DomainsCommand::List => {
            let domains = store.unreliable_domains()?;
            println!("{}", formatter.format_domains(&domains)?);
        }
    }
    Ok(())
}
