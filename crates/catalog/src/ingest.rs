use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::robot::Robot;

/// Announcement shape: a number, a closing parenthesis, then a name
/// containing `bot`, e.g. `207) Teabot. Brings you a nice cup of tea.`
static ANNOUNCEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|\s)(\d+)\) ([\w-]+bot\w*)").expect("announcement regex")
});

/// Parse a feed post into a catalog entry. Returns `None` when the post is
/// not a robot announcement; that is the common case, not a failure.
pub fn parse_announcement(text: &str, source_id: &str) -> Option<Robot> {
    let caps = ANNOUNCEMENT_RE.captures(text)?;
    let number: i64 = caps[1].parse().ok()?;
    let name = caps[2].to_string();
    let tags = derive_tags(text, &name);
    Some(Robot::new(number, name, source_id).with_tags(tags))
}

/// Tag set for an announcement: every lowercased body word except the
/// robot's own name, bare numbers, and single characters. Query-side
/// blacklisting handles the remaining filler words.
fn derive_tags(text: &str, name: &str) -> BTreeSet<String> {
    let name_lower = name.to_lowercase();
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|word| word.to_lowercase())
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|word| {
            word.chars().count() > 1
                && *word != name_lower
                && !word.chars().all(|c| c.is_ascii_digit())
        })
        .collect()
}
