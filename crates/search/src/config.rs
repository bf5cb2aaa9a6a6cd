use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::token::PartOfSpeech;

/// Fallback tag blacklist bundled into the binary; a data-directory file
/// replaces it wholesale when present.
const BUILTIN_BLACKLIST: &str = include_str!("../../../data/blacklist.txt");

/// Per-category score multipliers for the tag pass. The defaults are the
/// engine's long-standing tuning; categories left out of a config override
/// keep them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PosWeights {
    pub noun: f32,
    pub proper_noun: f32,
    pub adjective: f32,
    pub verb: f32,
    pub bot: f32,
    pub other: f32,
}

impl Default for PosWeights {
    fn default() -> Self {
        Self {
            noun: 10.0,
            proper_noun: 1.0,
            adjective: 8.0,
            verb: 5.0,
            bot: 10.0,
            other: 1.0,
        }
    }
}

impl PosWeights {
    #[must_use]
    pub fn weight(&self, pos: PartOfSpeech) -> f32 {
        match pos {
            PartOfSpeech::Noun => self.noun,
            PartOfSpeech::ProperNoun => self.proper_noun,
            PartOfSpeech::Adjective => self.adjective,
            PartOfSpeech::Verb => self.verb,
            PartOfSpeech::Bot => self.bot,
            PartOfSpeech::Other => self.other,
        }
    }
}

/// Everything the query pipeline needs besides the catalog itself. Built
/// from [`SearchOverrides`] merged over defaults, then treated as
/// immutable; reloading means building a fresh value and swapping it in.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Tokens excluded from the tag pass (generic request noise).
    pub blacklist: HashSet<String>,
    /// Exact tokens that signal a thank-you message.
    pub thank_keywords: Vec<String>,
    /// Responses to thank-you messages, picked at random. Repeats are
    /// legitimate and raise a phrase's odds.
    pub welcome_phrases: Vec<String>,
    pub weights: PosWeights,
    /// Flat bonus for multi-token runs that concatenate into a known name.
    pub compound_bonus: f32,
    /// Width of the winning score band in the tag pass.
    pub max_delta: f32,
    /// Most robots ever listed in one reply.
    pub max_results: usize,
    /// Base URL for links back to announcement posts.
    pub link_base: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            blacklist: parse_blacklist(BUILTIN_BLACKLIST),
            thank_keywords: ["thank", "thanks", "thx", "ty", "merci"]
                .map(String::from)
                .to_vec(),
            welcome_phrases: [
                "You're welcome!",
                "You're welcome!",
                "No problem!",
                "Just doing my job!",
                "My pleasure!",
            ]
            .map(String::from)
            .to_vec(),
            weights: PosWeights::default(),
            compound_bonus: 20.0,
            max_delta: 5.0,
            max_results: 4,
            link_base: None,
        }
    }
}

/// Optional knobs from the `[search]` table of the config file.
#[derive(Debug, Default, Deserialize)]
pub struct SearchOverrides {
    pub thank_keywords: Option<Vec<String>>,
    pub welcome_phrases: Option<Vec<String>>,
    pub weights: Option<PosWeights>,
    pub compound_bonus: Option<f32>,
    pub max_delta: Option<f32>,
    pub max_results: Option<usize>,
    pub link_base: Option<String>,
}

impl SearchConfig {
    pub fn from_overrides(overrides: SearchOverrides) -> Self {
        let defaults = Self::default();
        Self {
            blacklist: defaults.blacklist,
            thank_keywords: overrides.thank_keywords.unwrap_or(defaults.thank_keywords),
            welcome_phrases: overrides
                .welcome_phrases
                .unwrap_or(defaults.welcome_phrases),
            weights: overrides.weights.unwrap_or(defaults.weights),
            compound_bonus: overrides.compound_bonus.unwrap_or(defaults.compound_bonus),
            max_delta: overrides.max_delta.unwrap_or(defaults.max_delta),
            max_results: overrides.max_results.unwrap_or(defaults.max_results),
            link_base: overrides.link_base.or(defaults.link_base),
        }
    }

    /// Replace the blacklist with the contents of `path`.
    pub fn with_blacklist_file(mut self, path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.blacklist = parse_blacklist(&text);
        log::debug!(
            "Loaded {} blacklist entries from {}",
            self.blacklist.len(),
            path.display()
        );
        Ok(self)
    }
}

/// One lowercased token per line; blank lines and `#` comments are skipped.
pub fn parse_blacklist(text: &str) -> HashSet<String> {
    text.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
