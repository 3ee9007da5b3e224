//! Attack corpus loading.
//!
//! A corpus is a JSON array of prompt strings. It is loaded once, stays
//! immutable for the run, and its order is the run's reproducibility contract.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why the attack corpus could not be loaded.
///
/// Either variant is fatal: the run aborts before any report is written.
#[derive(Debug, Error)]
pub enum CorpusLoadError {
    #[error("failed to read attack corpus {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("attack corpus {} is not a JSON array of strings: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the ordered attack corpus from `path`.
pub fn load(path: &Path) -> Result<Vec<String>, CorpusLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| CorpusLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CorpusLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
