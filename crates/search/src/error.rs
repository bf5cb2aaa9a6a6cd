use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Failures while building an engine or loading its configuration. Query
/// paths are total and never return errors.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid search configuration: {0}")]
    Config(#[from] toml::de::Error),
}
