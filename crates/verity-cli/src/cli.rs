//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Verity - check claims against a fact-check corpus.
#[derive(Debug, Parser)]
#[command(name = "verity")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path (overrides config and VERITY_DATABASE)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (verdict only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify a claim
    Check(CheckArgs),

    /// Ingest scraped fact-checks from JSON files once
    Ingest(IngestArgs),

    /// Ingest scraped fact-checks periodically until Ctrl+C
    Watch(WatchArgs),

    /// Show corpus statistics and recent ingestion runs
    Stats(StatsArgs),

    /// Manage the unreliable-source list
    #[command(subcommand)]
    Domains(DomainsCommand),
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Claim text
    #[arg(required = true, num_args = 1..)]
    pub claim: Vec<String>,

    /// URL of an image shared with the claim
    #[arg(long)]
    pub image_url: Option<String>,

    /// URL of the post or article the claim came from
    #[arg(long)]
    pub source_url: Option<String>,

    /// Answer from the corpus only, never call the reasoner
    #[arg(long)]
    pub offline: bool,
}

impl CheckArgs {
    /// Claim text as a single string
    pub fn text(&self) -> String {
        self.claim.join(" ")
    }
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON files of scraped claims; each file is one source named after its stem
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Also drop near-duplicates within each batch
    #[arg(long)]
    pub dedupe_within_batch: bool,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// JSON files of scraped claims, re-read on every cycle
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Minutes between cycles (overrides config)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Stop after this many cycles
    #[arg(long)]
    pub cycles: Option<usize>,
}

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Number of recent ingestion runs to show
    #[arg(short, long, default_value = "10")]
    pub runs: usize,
}

/// Unreliable-source list commands.
#[derive(Debug, Subcommand)]
pub enum DomainsCommand {
    /// Add a domain, or update its entry
    Add {
        /// Domain name; subdomains are covered too
        domain: String,

        /// Category such as "satire" or "fabricated"
        #[arg(short, long, default_value = "unreliable")]
        category: String,

        /// Why the domain is listed
        #[arg(short, long, default_value = "")]
        reason: String,
    },

    /// List active entries
    List,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from(["verity", "check", "Free", "laptops", "--offline"]);
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.text(), "Free laptops");
                assert!(args.offline);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["verity", "stats", "--format", "json", "--database", "x.db"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.database, Some(PathBuf::from("x.db")));
        assert!(matches!(cli.command, Command::Stats(StatsArgs { runs: 10 })));
    }

    #[test]
    fn test_domains_add_command() {
        let cli = Cli::parse_from(["verity", "domains", "add", "hoax.example", "-c", "satire"]);
        match cli.command {
            Command::Domains(DomainsCommand::Add {
                domain,
                category,
                reason,
            }) => {
                assert_eq!(domain, "hoax.example");
                assert_eq!(category, "satire");
                assert!(reason.is_empty());
            }
            _ => panic!("Expected Domains Add command"),
        }
    }

    #[test]
    fn test_check_requires_claim() {
        assert!(Cli::try_parse_from(["verity", "check"]).is_err());
    }

    #[test]
    fn test_watch_command() {
        let cli = Cli::parse_from(["verity", "watch", "a.json", "b.json", "--cycles", "2"]);
        match cli.command {
            Command::Watch(args) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.cycles, Some(2));
                assert_eq!(args.interval, None);
            }
            _ => panic!("Expected Watch command"),
        }
    }
}
