/// A normalized unit of query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The fragment as it appeared in the query, pre-normalization.
    pub raw: String,
    /// Lowercased, punctuation-stripped form. All matching runs on this.
    pub text: String,
}

impl Token {
    pub fn new(raw: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            text: text.into(),
        }
    }
}

/// Grammatical category assigned by an [`Analyzer`](crate::Analyzer).
///
/// `Bot` is not grammatical at all: it marks the stripped stem of a
/// `...bot` token, which is the strongest topical signal a query carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Bot,
    Other,
}

/// A token annotated for tag scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub stem: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, stem: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self {
            text: text.into(),
            stem: stem.into(),
            pos,
        }
    }
}
