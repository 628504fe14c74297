//! Command implementations.

pub mod check;
pub mod domains;
pub mod ingest;
pub mod stats;
pub mod watch;

pub use self::check::execute_check;
pub use self::domains::execute_domains;
pub use self::ingest::execute_ingest;
pub use self::stats::execute_stats;
pub use self::watch::execute_watch;

use crate::config::VerityConfig;
use crate::error::Result;
use std::fs;
use std::path::PathBuf;
use verity_ingest::{ClaimSource, JsonFileSource};
use verity_store::SqliteStore;

/// Open the configured database, creating its directory if needed
pub(crate) fn open_store(config: &VerityConfig) -> Result<SqliteStore> {
    let path = config.database_path();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(SqliteStore::new(path)?)
}

/// One JSON file source per path, named after the file stem
pub(crate) fn file_sources(files: &[PathBuf]) -> Vec<Box<dyn ClaimSource>> {
    files
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Box::new(JsonFileSource::new(name, path)) as Box<dyn ClaimSource>
        })
        .collect()
}
