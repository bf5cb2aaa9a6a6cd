//! # Smolbot Catalog
//!
//! The robot dataset behind the query engine: a numbered list of small
//! robots with names and descriptive tags, plus the derived indices the
//! search pipeline probes (canonical name, number, tag).
//!
//! The catalog is loaded whole from a JSON file, queried in memory, and
//! persisted atomically. New robots arrive by parsing announcement posts
//! with [`parse_announcement`].

mod catalog;
mod error;
mod ingest;
mod robot;

pub use catalog::{name_key, strip_bot_suffix, Catalog};
pub use error::{CatalogError, Result};
pub use ingest::parse_announcement;
pub use robot::Robot;
