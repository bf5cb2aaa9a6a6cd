use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One catalogued robot: a unique number, a display name, and the
/// descriptive tags derived from its announcement post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub number: i64,
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Identifier of the feed post this robot was parsed from. Opaque to
    /// the search engine; only used to build outbound links.
    #[serde(default)]
    pub source_id: String,
}

impl Robot {
    pub fn new(number: i64, name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            tags: BTreeSet::new(),
            source_id: source_id.into(),
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Link back to the announcement post, when a link base is configured
    /// and the robot knows which post it came from.
    pub fn source_link(&self, link_base: Option<&str>) -> Option<String> {
        let base = link_base?;
        if self.source_id.is_empty() {
            return None;
        }
        Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.source_id
        ))
    }

    /// Single-line rendering used in replies: `#207 Teabot`, plus the
    /// source link when one is available.
    pub fn display_line(&self, link_base: Option<&str>) -> String {
        match self.source_link(link_base) {
            Some(link) => format!("#{} {} {}", self.number, self.name, link),
            None => format!("#{} {}", self.number, self.name),
        }
    }
}
