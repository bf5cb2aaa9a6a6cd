use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::Token;

/// `#hashtag` runs: stripped when they start the text or follow a char
/// outside `[A-Za-z0-9.-]`. Underscores bound a handle even though handle
/// bodies may contain them. The boundary character is re-emitted via the
/// capture group, since the `regex` crate has no lookbehind.
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9.-])#[A-Za-z_][A-Za-z0-9_]+").expect("hashtag regex")
});

/// `@mention` runs, same boundary rule as hashtags.
static MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^A-Za-z0-9.-])@[A-Za-z_][A-Za-z0-9_]+").expect("mention regex")
});

/// Hyphen pass: a hyphen splits words unless it introduces a number, so
/// `Tinybot-9000` becomes two tokens while a leading `-9000` survives to
/// the sanitizer. A hyphen glued to a preceding non-space always splits.
fn split_hyphens(query: &str) -> String {
    let chars: Vec<char> = query.chars().collect();
    let mut out = String::with_capacity(query.len());
    for (i, &c) in chars.iter().enumerate() {
        if c != '-' {
            out.push(c);
            continue;
        }
        let introduces_word = chars.get(i + 1).is_some_and(|next| !next.is_ascii_digit());
        let glued_to_prev = i
            .checked_sub(1)
            .and_then(|p| chars.get(p))
            .is_some_and(|prev| !prev.is_whitespace());
        if introduces_word || glued_to_prev {
            out.push(' ');
        } else {
            out.push('-');
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_token_char(c: char) -> bool {
    is_word_char(c) || c == '-' || c == '\''
}

/// Per-fragment cleanup: lowercase, typographic apostrophes normalized,
/// interior junk dropped, then stray `'`/`-` trimmed off both ends so the
/// result always starts and ends with a word character.
fn sanitize_fragment(fragment: &str) -> String {
    let lowered = fragment.to_lowercase().replace('\u{2019}', "'");
    let kept: String = lowered.chars().filter(|&c| is_token_char(c)).collect();
    kept.trim_matches(|c: char| !is_word_char(c)).to_string()
}

/// Tokenize a raw query: hyphen pass, hashtag/mention strip, whitespace
/// split, per-fragment sanitize. Empty fragments are dropped and order is
/// preserved.
pub fn tokenize(query: &str) -> Vec<Token> {
    let spaced = split_hyphens(query);
    let without_hashtags = HASHTAG_RE.replace_all(&spaced, "$1");
    let cleaned = MENTION_RE.replace_all(&without_hashtags, "$1");

    cleaned
        .split_whitespace()
        .filter_map(|fragment| {
            let text = sanitize_fragment(fragment);
            if text.is_empty() {
                None
            } else {
                Some(Token::new(fragment, text))
            }
        })
        .collect()
}
