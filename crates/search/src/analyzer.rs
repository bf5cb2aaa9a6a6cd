use rust_stemmers::{Algorithm, Stemmer};

use crate::token::{PartOfSpeech, TaggedToken, Token};

/// Linguistic capability behind the tag scorer: grammatical category
/// assignment plus stemming. Implementations must be deterministic; the
/// scorer calls them once per token per query. `tag` receives the whole
/// token sequence so implementations may use context.
pub trait Analyzer: Send + Sync {
    fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken>;

    /// Stem used for the half-weight tag fallback.
    fn stem(&self, text: &str) -> String;
}

/// Words that carry no topical signal on their own.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "if", "of", "in", "on", "at", "to", "for", "with",
    "from", "by", "as", "is", "are", "am", "was", "were", "be", "been", "being", "do", "does",
    "did", "have", "has", "had", "will", "would", "can", "could", "should", "shall", "may",
    "might", "must", "this", "that", "these", "those", "there", "here", "it", "its", "he", "she",
    "they", "them", "him", "his", "her", "their", "my", "your", "our", "me", "you", "i", "we",
    "us", "what", "which", "who", "whom", "why", "where", "when", "how", "not", "no", "yes",
    "oh", "ok", "okay", "please", "hello", "hey", "hi", "so", "too", "very", "just", "any",
    "some", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// Common request verbs, listed with their frequent inflections since the
/// classifier sees one lowercased word at a time.
const VERBS: &[&str] = &[
    "bring", "brings", "bringing", "brought", "make", "makes", "making", "made", "give",
    "gives", "giving", "gave", "take", "takes", "taking", "took", "find", "finds", "found",
    "show", "shows", "showed", "tell", "tells", "told", "want", "wants", "wanted", "need",
    "needs", "needed", "love", "loves", "loved", "like", "likes", "liked", "help", "helps",
    "helped", "hold", "holds", "held", "carry", "carries", "carried", "serve", "serves",
    "served", "deliver", "delivers", "delivered", "draw", "draws", "drew", "dance", "dances",
    "danced", "sing", "sang", "swim", "swims", "swam", "run", "runs", "ran", "jump", "jumps",
    "jumped", "fly", "flies", "flew", "drive", "drives", "drove", "ride", "rides", "rode",
    "play", "plays", "played", "clean", "cleans", "cleaned", "cook", "cooks", "cooked", "bake",
    "bakes", "baked", "build", "builds", "built", "fix", "fixes", "fixed", "go", "goes",
    "went", "come", "comes", "came", "look", "looks", "looked", "see", "sees", "saw", "watch",
    "watches", "watched", "keep", "keeps", "kept", "get", "gets", "got", "put", "puts", "let",
    "lets", "say", "says", "said", "know", "knows", "knew", "live", "lives", "lived", "eat",
    "eats", "ate", "drink", "drinks", "drank", "sit", "sits", "sat", "wave", "waves", "waved",
];

const ADJECTIVES: &[&str] = &[
    "small", "smol", "big", "little", "tiny", "cute", "happy", "sad", "angry", "fast", "slow",
    "quick", "speedy", "good", "bad", "best", "nice", "kind", "old", "new", "young", "tall",
    "short", "long", "round", "soft", "hard", "warm", "cold", "hot", "cool", "red", "blue",
    "green", "yellow", "pink", "purple", "orange", "black", "white", "brown", "grey", "gray",
    "fluffy", "fuzzy", "shiny", "sparkly", "shy", "brave", "clever", "smart", "silly",
    "friendly", "sleepy", "hungry", "thirsty", "noisy", "quiet", "gentle", "strong", "wobbly",
    "bouncy",
];

/// `-ing` words that are nouns in practice.
const ING_EXCEPTIONS: &[&str] = &[
    "thing", "things", "king", "ring", "wing", "spring", "string", "morning", "evening",
    "nothing", "something", "anything", "everything", "darling", "duckling", "sibling",
    "thanksgiving", "painting", "drawing",
];

/// `-ed` words that are not past-tense verbs.
const ED_EXCEPTIONS: &[&str] = &["speed", "seed", "indeed", "hundred", "wicked"];

fn is_verb_like(text: &str) -> bool {
    if VERBS.contains(&text) {
        return true;
    }
    if text.len() > 4 && text.ends_with("ing") && !ING_EXCEPTIONS.contains(&text) {
        return true;
    }
    text.len() > 3 && text.ends_with("ed") && !ED_EXCEPTIONS.contains(&text)
}

fn is_adjective_like(text: &str) -> bool {
    if ADJECTIVES.contains(&text) {
        return true;
    }
    ["less", "ful", "ous"]
        .iter()
        .any(|suffix| text.len() > suffix.len() && text.ends_with(suffix))
}

fn classify(text: &str) -> PartOfSpeech {
    if text.chars().all(|c| c.is_ascii_digit()) {
        return PartOfSpeech::Other;
    }
    if FUNCTION_WORDS.contains(&text) {
        return PartOfSpeech::Other;
    }
    if is_verb_like(text) {
        return PartOfSpeech::Verb;
    }
    if is_adjective_like(text) {
        return PartOfSpeech::Adjective;
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        // Alphanumeric mixes read like model names: r2d2, c3po.
        return PartOfSpeech::ProperNoun;
    }
    PartOfSpeech::Noun
}

/// Rule-based tagger plus a Snowball English stemmer. The tags are
/// coarse; the scorer only needs nouns and adjectives weighted above
/// filler words.
pub struct EnglishAnalyzer {
    stemmer: Stemmer,
}

impl EnglishAnalyzer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for EnglishAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for EnglishAnalyzer {
    fn tag(&self, tokens: &[Token]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|token| {
                TaggedToken::new(
                    token.text.clone(),
                    self.stem(&token.text),
                    classify(&token.text),
                )
            })
            .collect()
    }

    fn stem(&self, text: &str) -> String {
        self.stemmer.stem(text).to_string()
    }
}
