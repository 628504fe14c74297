//! Verity CLI - check claims against a fact-check corpus.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use verity_cli::{build_reasoner, Cli, Command, VerityConfig};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = VerityConfig::load(cli.config.as_deref())?.with_env_overrides()?;
    if let Some(database) = &cli.database {
        config.database = Some(database.clone());
    }
    if let Command::Check(args) = &cli.command {
        if args.offline {
            config.pipeline.reasoner_enabled = false;
        }
    }

    // Blocking HTTP clients must be created and dropped outside the runtime
    let reasoner = match &cli.command {
        Command::Check(_) => build_reasoner(&config)?,
        _ => None,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(verity_cli::run(cli, config, reasoner.clone()))?;
    drop(runtime);
    drop(reasoner);
    Ok(())
}
