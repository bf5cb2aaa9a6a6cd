use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] smolbot_catalog::CatalogError),

    #[error("Search error: {0}")]
    Search(#[from] smolbot_search::SearchError),

    #[error("State I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid state data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid bot configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}
