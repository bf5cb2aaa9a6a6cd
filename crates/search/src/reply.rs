use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use smolbot_catalog::Catalog;

use crate::config::SearchConfig;

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    NameMatch,
    NumberMatch,
    Random,
    Gratitude,
    TagMatch,
    NoMatch,
}

/// A response ready for transmission. Plain text; transports apply their
/// own outbound substitutions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

const NO_MATCH_TEXT: &str = "Sorry, I couldn't find the robot you're looking for. \
     This might be because the robot isn't indexed yet, or because your request \
     is too complicated for me.";

pub(crate) fn no_match_reply() -> Reply {
    Reply {
        kind: ReplyKind::NoMatch,
        text: NO_MATCH_TEXT.to_string(),
    }
}

/// Shortlist formatting: one robot inline, short lists line by line. The
/// caller passes positions best-first; everything past the configured
/// maximum is dropped here.
pub(crate) fn robot_list_reply(
    catalog: &Catalog,
    config: &SearchConfig,
    kind: ReplyKind,
    positions: &[usize],
) -> Reply {
    let lines: Vec<String> = positions
        .iter()
        .take(config.max_results)
        .filter_map(|&position| catalog.get(position))
        .map(|robot| robot.display_line(config.link_base.as_deref()))
        .collect();

    let text = match lines.len() {
        0 => return no_match_reply(),
        1 => format!("I found {}", lines[0]),
        2 => format!("I found a couple of robots:\n{}", lines.join("\n")),
        _ => format!("I found a few different robots:\n{}", lines.join("\n")),
    };
    Reply { kind, text }
}

pub(crate) fn random_reply(
    catalog: &Catalog,
    config: &SearchConfig,
    positions: &[usize],
) -> Reply {
    match positions.first().and_then(|&position| catalog.get(position)) {
        Some(robot) => Reply {
            kind: ReplyKind::Random,
            text: format!(
                "Here's your randomly chosen robot, {}",
                robot.display_line(config.link_base.as_deref())
            ),
        },
        None => no_match_reply(),
    }
}

pub(crate) fn gratitude_reply<R: Rng>(config: &SearchConfig, rng: &mut R) -> Reply {
    let text = config
        .welcome_phrases
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| "You're welcome!".to_string());
    Reply {
        kind: ReplyKind::Gratitude,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smolbot_catalog::Robot;

    fn catalog() -> Catalog {
        Catalog::from_robots(vec![
            Robot::new(1, "Teabot", "100"),
            Robot::new(2, "Coffeebot", "101"),
            Robot::new(3, "Mugbot", "102"),
            Robot::new(4, "Pancakebot", "103"),
            Robot::new(5, "Hugbot", "104"),
        ])
        .expect("unique numbers")
    }

    #[test]
    fn one_match_is_inlined() {
        let reply = robot_list_reply(
            &catalog(),
            &SearchConfig::default(),
            ReplyKind::NameMatch,
            &[0],
        );
        assert_eq!(reply.kind, ReplyKind::NameMatch);
        assert_eq!(reply.text, "I found #1 Teabot");
    }

    #[test]
    fn two_matches_are_a_couple() {
        let reply = robot_list_reply(
            &catalog(),
            &SearchConfig::default(),
            ReplyKind::TagMatch,
            &[0, 2],
        );
        assert_eq!(
            reply.text,
            "I found a couple of robots:\n#1 Teabot\n#3 Mugbot"
        );
    }

    #[test]
    fn three_or_more_are_a_few() {
        let reply = robot_list_reply(
            &catalog(),
            &SearchConfig::default(),
            ReplyKind::TagMatch,
            &[0, 1, 2],
        );
        assert!(reply
            .text
            .starts_with("I found a few different robots:\n"));
    }

    #[test]
    fn shortlist_is_capped() {
        let reply = robot_list_reply(
            &catalog(),
            &SearchConfig::default(),
            ReplyKind::TagMatch,
            &[0, 1, 2, 3, 4],
        );
        assert_eq!(reply.text.matches('#').count(), 4);
        assert!(!reply.text.contains("Hugbot"));
    }

    #[test]
    fn out_of_range_positions_degrade_to_no_match() {
        let reply = robot_list_reply(
            &catalog(),
            &SearchConfig::default(),
            ReplyKind::TagMatch,
            &[99],
        );
        assert_eq!(reply.kind, ReplyKind::NoMatch);
        assert!(reply.text.starts_with("Sorry, I couldn't find the robot"));
    }

    #[test]
    fn links_are_appended_when_configured() {
        let config = SearchConfig {
            link_base: Some("https://example.com/posts".to_string()),
            ..SearchConfig::default()
        };
        let reply = robot_list_reply(&catalog(), &config, ReplyKind::NameMatch, &[0]);
        assert_eq!(reply.text, "I found #1 Teabot https://example.com/posts/100");
    }

    #[test]
    fn gratitude_picks_a_known_phrase() {
        let config = SearchConfig::default();
        let mut rng = rand::thread_rng();
        let reply = gratitude_reply(&config, &mut rng);
        assert_eq!(reply.kind, ReplyKind::Gratitude);
        assert!(config.welcome_phrases.contains(&reply.text));
    }

    #[test]
    fn random_reply_names_its_pick() {
        let reply = random_reply(&catalog(), &SearchConfig::default(), &[2]);
        assert_eq!(reply.kind, ReplyKind::Random);
        assert_eq!(
            reply.text,
            "Here's your randomly chosen robot, #3 Mugbot"
        );
    }

    #[test]
    fn reply_serializes_for_machine_consumers() {
        let reply = no_match_reply();
        let json = serde_json::to_value(&reply).expect("serializable");
        assert_eq!(json["kind"], "no_match");
    }
}
