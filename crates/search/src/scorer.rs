use std::cmp::Ordering;
use std::collections::HashMap;

use smolbot_catalog::{strip_bot_suffix, Catalog};

use crate::analyzer::Analyzer;
use crate::config::SearchConfig;
use crate::matcher::{dedup_first_seen, name_probes};
use crate::token::{PartOfSpeech, TaggedToken, Token};

/// Accumulated tag scores per catalog position.
///
/// Three additive passes over the tagged tokens:
/// 1. partial names: every token probed against the name index at double
///    its category weight;
/// 2. compounds: 2- and 3-token concatenations probed against the name
///    index for a flat bonus;
/// 3. tags: literal hits at full weight, stem-only hits at half, with
///    blacklisted tokens skipped (bot-stripped stems are exempt).
pub fn tag_scores(
    catalog: &Catalog,
    config: &SearchConfig,
    analyzer: &dyn Analyzer,
    tokens: &[Token],
) -> HashMap<usize, f32> {
    let mut tagged = analyzer.tag(tokens);

    // A `...bot` suffix is a strong topical signal independent of grammar:
    // score the stripped stem again as its own entry. Bare `bot`/`bots`
    // strips to nothing and synthesizes nothing.
    let synthesized: Vec<TaggedToken> = tagged
        .iter()
        .filter(|entry| entry.text.ends_with("bot") || entry.text.ends_with("bots"))
        .filter_map(|entry| {
            let stripped = strip_bot_suffix(&entry.text);
            if stripped.is_empty() {
                None
            } else {
                Some(TaggedToken::new(
                    stripped,
                    analyzer.stem(stripped),
                    PartOfSpeech::Bot,
                ))
            }
        })
        .collect();
    tagged.extend(synthesized);

    let mut scores: HashMap<usize, f32> = HashMap::new();

    for entry in &tagged {
        let hits = name_probes(catalog, &entry.text);
        if hits.is_empty() {
            continue;
        }
        let bonus = config.weights.weight(entry.pos) * 2.0;
        for position in hits {
            *scores.entry(position).or_insert(0.0) += bonus;
        }
    }

    for window in 2..=3 {
        for position in compound_probes(catalog, tokens, window) {
            *scores.entry(position).or_insert(0.0) += config.compound_bonus;
        }
    }

    for entry in &tagged {
        if entry.pos != PartOfSpeech::Bot && config.blacklist.contains(&entry.text) {
            continue;
        }
        let literal_hits = catalog.get_by_tag(&entry.text);
        let full = config.weights.weight(entry.pos);
        for &position in literal_hits {
            *scores.entry(position).or_insert(0.0) += full;
        }
        if entry.stem != entry.text {
            for &position in catalog.get_by_tag(&entry.stem) {
                if literal_hits.contains(&position) {
                    continue;
                }
                *scores.entry(position).or_insert(0.0) += full * 0.5;
            }
        }
    }

    scores
}

/// Ranked tag-pass result: positions within `max_delta` of the best score,
/// best first, ties broken by catalog position.
pub fn score_by_tags(
    catalog: &Catalog,
    config: &SearchConfig,
    analyzer: &dyn Analyzer,
    tokens: &[Token],
) -> Vec<usize> {
    let scores = tag_scores(catalog, config, analyzer, tokens);
    log::debug!("Tag pass scored {} robot(s)", scores.len());

    let mut ranked: Vec<(usize, f32)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    let Some(&(_, best)) = ranked.first() else {
        return Vec::new();
    };
    ranked
        .into_iter()
        .take_while(|(_, score)| best - score <= config.max_delta)
        .map(|(position, _)| position)
        .collect()
}

/// Positions matched by concatenating each `window`-token run, deduped
/// within one window size so a robot collects the bonus at most once per
/// size.
fn compound_probes(catalog: &Catalog, tokens: &[Token], window: usize) -> Vec<usize> {
    if tokens.len() < window {
        return Vec::new();
    }
    let mut found = Vec::new();
    for start in 0..=(tokens.len() - window) {
        let compound: String = tokens[start..start + window]
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        found.extend(name_probes(catalog, &compound));
    }
    dedup_first_seen(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smolbot_catalog::Robot;

    use crate::analyzer::EnglishAnalyzer;
    use crate::tokenizer::tokenize;

    fn catalog() -> Catalog {
        Catalog::from_robots(vec![
            Robot::new(1, "Teabot", "100").with_tags(["tea", "drink", "cup"]),
            Robot::new(2, "Coffeebot", "101").with_tags(["coffee", "drink", "cup"]),
            Robot::new(3, "Superspeedybot", "102").with_tags(["fast", "zoom"]),
            Robot::new(4, "Pancake", "103").with_tags(["breakfast", "syrup"]),
            Robot::new(5, "Gadget", "104").with_tags(["new", "shiny"]),
        ])
        .expect("unique numbers")
    }

    fn run(query: &str) -> Vec<usize> {
        let catalog = catalog();
        let config = SearchConfig::default();
        let analyzer = EnglishAnalyzer::new();
        score_by_tags(&catalog, &config, &analyzer, &tokenize(query))
    }

    fn scores(query: &str) -> HashMap<usize, f32> {
        let catalog = catalog();
        let config = SearchConfig::default();
        let analyzer = EnglishAnalyzer::new();
        tag_scores(&catalog, &config, &analyzer, &tokenize(query))
    }

    #[test]
    fn topical_nouns_find_their_robot() {
        assert_eq!(run("is there a tea robot?"), vec![0]);
        assert_eq!(run("breakfast please!"), vec![3]);
    }

    #[test]
    fn bot_suffix_scores_the_stripped_stem() {
        // "teabot" never matches a tag literally, but its stripped stem
        // does, and the partial-name probe lands on Teabot as well.
        let scored = scores("teabot");
        assert!(scored[&0] > 0.0);
        assert_eq!(scored.len(), 1);
    }

    #[test]
    fn bare_bot_synthesizes_nothing() {
        assert_eq!(run("bots"), Vec::<usize>::new());
    }

    #[test]
    fn compound_runs_collect_the_flat_bonus() {
        // No single token matches; "super" + "speedy" concatenated is a
        // known name.
        let scored = scores("super speedy");
        assert_eq!(scored[&2], 20.0);
        assert_eq!(run("super speedy"), vec![2]);
    }

    #[test]
    fn stem_only_hits_score_half() {
        // "drinks" is a verb (weight 5); neither robot carries the literal
        // tag, both carry the stem "drink".
        let scored = scores("drinks robot");
        assert_eq!(scored[&0], 2.5);
        assert_eq!(scored[&1], 2.5);
    }

    #[test]
    fn blacklisted_tokens_never_reach_the_tag_pass() {
        assert_eq!(run("show me a robot please"), Vec::<usize>::new());
    }

    #[test]
    fn blacklisted_words_score_nothing_even_as_tags() {
        // Gadget carries "new" as a tag, but "new" is request noise; only
        // the non-blacklisted tag reaches it.
        assert_eq!(run("new"), Vec::<usize>::new());
        assert_eq!(run("shiny"), vec![4]);
    }

    #[test]
    fn bot_stripped_stems_are_exempt_from_the_blacklist() {
        // Bare "new" is noise, but "newbot" names a topic: the stem
        // stripped from it keeps its tag hit at the bot weight.
        let scored = scores("newbot");
        assert_eq!(scored[&4], 10.0);
        assert_eq!(scored.len(), 1);
    }

    #[test]
    fn losers_outside_the_band_are_cut() {
        // Coffeebot: name probe (20) + "coffee" (10) + "cup" (10) = 40.
        // Teabot only shares "cup" (10), far outside the 5-point band.
        assert_eq!(run("coffee cup"), vec![1]);
    }

    #[test]
    fn ties_resolve_by_catalog_position() {
        assert_eq!(run("cup"), vec![0, 1]);
    }

    #[test]
    fn adding_a_matching_token_never_lowers_a_score() {
        let before = scores("cup");
        let after = scores("cup tea");
        assert!(after[&0] > before[&0]);
        assert_eq!(after.get(&1), before.get(&1));
    }

    #[test]
    fn empty_queries_score_nothing() {
        assert_eq!(run(""), Vec::<usize>::new());
        assert!(scores("?!").is_empty());
    }
}
