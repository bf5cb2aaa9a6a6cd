use std::collections::HashSet;

use smolbot_catalog::{strip_bot_suffix, Catalog};

use crate::token::Token;

/// Dedup positions while keeping first-seen order, so earlier matches keep
/// their precedence in the reply list.
pub fn dedup_first_seen(positions: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut seen = HashSet::new();
    positions
        .into_iter()
        .filter(|position| seen.insert(*position))
        .collect()
}

/// Name-index probes for one candidate string: verbatim, with an added
/// `s`, and with one trailing `s` removed. Tolerates the singular/plural
/// drift between how people type names and how they were announced.
pub(crate) fn name_probes(catalog: &Catalog, candidate: &str) -> Vec<usize> {
    let mut found = Vec::new();
    found.extend_from_slice(catalog.get_by_name(candidate));
    let plural = format!("{candidate}s");
    found.extend_from_slice(catalog.get_by_name(&plural));
    if let Some(singular) = candidate.strip_suffix('s') {
        found.extend_from_slice(catalog.get_by_name(singular));
    }
    dedup_first_seen(found)
}

/// Direct name matching.
///
/// Every token containing `bot` is suffix-stripped and probed against the
/// name index. A bare `bot`/`bots` token additionally probes every
/// concatenation of the tokens before it, which is how "super speedy bot"
/// finds Superspeedybot.
pub fn match_by_name(catalog: &Catalog, tokens: &[Token]) -> Vec<usize> {
    let mut found = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        if !token.text.contains("bot") {
            continue;
        }

        let stripped = strip_bot_suffix(&token.text);
        if !stripped.is_empty() {
            found.extend(name_probes(catalog, stripped));
        }

        if token.text == "bot" || token.text == "bots" {
            for start in 0..index {
                let compound: String = tokens[start..index]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect();
                found.extend_from_slice(catalog.get_by_name(&compound));
            }
        }
    }
    let found = dedup_first_seen(found);
    if !found.is_empty() {
        log::debug!("Name match: {} robot(s)", found.len());
    }
    found
}

/// Direct number matching: every token that parses as a signed integer is
/// looked up in the number index.
pub fn match_by_number(catalog: &Catalog, tokens: &[Token]) -> Vec<usize> {
    let mut found = Vec::new();
    for token in tokens {
        if let Ok(number) = token.text.parse::<i64>() {
            found.extend(catalog.get_by_number(number));
        }
    }
    let found = dedup_first_seen(found);
    if !found.is_empty() {
        log::debug!("Number match: {} robot(s)", found.len());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smolbot_catalog::Robot;

    use crate::tokenizer::tokenize;

    fn catalog() -> Catalog {
        Catalog::from_robots(vec![
            Robot::new(207, "Teabot", "100").with_tags(["tea", "drink"]),
            Robot::new(84, "Superspeedybot", "101").with_tags(["fast"]),
            Robot::new(3, "Pancake", "102").with_tags(["breakfast"]),
            Robot::new(12, "Mugsbot", "103").with_tags(["mug"]),
        ])
        .expect("unique numbers")
    }

    #[test]
    fn finds_a_robot_by_suffixed_name() {
        let catalog = catalog();
        assert_eq!(match_by_name(&catalog, &tokenize("teabot please")), vec![0]);
        assert_eq!(match_by_name(&catalog, &tokenize("TEABOTS?")), vec![0]);
    }

    #[test]
    fn suffix_stripping_reaches_unsuffixed_names() {
        // The catalog entry is literally named "Pancake"; "pancakebot"
        // still finds it.
        let catalog = catalog();
        assert_eq!(match_by_name(&catalog, &tokenize("pancakebot")), vec![2]);
    }

    #[test]
    fn plural_drift_is_tolerated() {
        let catalog = catalog();
        // "Mugsbot" keys as "mugs"; "mugbot" lands on it through the
        // added-s probe.
        assert_eq!(match_by_name(&catalog, &tokenize("mugbot")), vec![3]);
        // "Teabot" keys as "tea"; "teasbot" lands on it through the
        // removed-s probe.
        assert_eq!(match_by_name(&catalog, &tokenize("teasbot")), vec![0]);
    }

    #[test]
    fn bare_bot_token_probes_compounds() {
        let catalog = catalog();
        assert_eq!(
            match_by_name(&catalog, &tokenize("super speedy bot")),
            vec![1]
        );
        assert_eq!(
            match_by_name(&catalog, &tokenize("the super speedy bot!")),
            vec![1]
        );
    }

    #[test]
    fn tokens_without_bot_do_not_probe_names() {
        let catalog = catalog();
        assert_eq!(match_by_name(&catalog, &tokenize("tea")), Vec::<usize>::new());
        assert_eq!(
            match_by_name(&catalog, &tokenize("pancake")),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn number_tokens_hit_the_number_index() {
        let catalog = catalog();
        assert_eq!(match_by_number(&catalog, &tokenize("robot 207")), vec![0]);
        assert_eq!(match_by_number(&catalog, &tokenize("#84")), vec![1]);
        assert_eq!(
            match_by_number(&catalog, &tokenize("robot 9999")),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn repeated_hits_are_deduplicated_in_order() {
        let catalog = catalog();
        assert_eq!(
            match_by_name(&catalog, &tokenize("teabot teabot mugbot")),
            vec![0, 3]
        );
        assert_eq!(match_by_number(&catalog, &tokenize("207 84 207")), vec![0, 1]);
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        assert_eq!(dedup_first_seen([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
