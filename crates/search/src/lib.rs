//! # Smolbot Search
//!
//! Query understanding and ranking over the robot catalog. A free-text
//! question goes through a tokenizer, a short chain of intent checks, and
//! a weighted tag scorer; the first stage with an answer wins:
//!
//! ```text
//! query -> tokenize -> names -> numbers -> random -> thanks -> tags
//! ```
//!
//! ```
//! use std::sync::Arc;
//! use smolbot_catalog::{Catalog, Robot};
//! use smolbot_search::{Engine, SearchConfig};
//!
//! let robot = Robot::new(207, "Teabot", "100").with_tags(["tea", "drink"]);
//! let catalog = Catalog::from_robots(vec![robot]).unwrap();
//! let engine = Engine::new(Arc::new(catalog), Arc::new(SearchConfig::default()));
//!
//! let reply = engine.search("is there a teabot?");
//! assert_eq!(reply.text, "I found #207 Teabot");
//! ```

mod analyzer;
mod config;
mod engine;
mod error;
mod intent;
mod matcher;
mod reply;
mod scorer;
mod token;
mod tokenizer;

pub use analyzer::{Analyzer, EnglishAnalyzer};
pub use config::{parse_blacklist, PosWeights, SearchConfig, SearchOverrides};
pub use engine::Engine;
pub use error::{Result, SearchError};
pub use intent::{is_gratitude, is_random_request};
pub use matcher::{dedup_first_seen, match_by_name, match_by_number};
pub use reply::{Reply, ReplyKind};
pub use scorer::{score_by_tags, tag_scores};
pub use token::{PartOfSpeech, TaggedToken, Token};
pub use tokenizer::tokenize;
