use std::sync::Arc;

use smolbot_catalog::Catalog;

use crate::analyzer::{Analyzer, EnglishAnalyzer};
use crate::config::SearchConfig;
use crate::intent::{is_gratitude, is_random_request};
use crate::matcher::{match_by_name, match_by_number};
use crate::reply::{gratitude_reply, no_match_reply, random_reply, robot_list_reply, Reply};
use crate::reply::ReplyKind;
use crate::scorer::score_by_tags;
use crate::tokenizer::tokenize;

/// The query pipeline over one catalog snapshot.
///
/// Stages run in a fixed order and the first that produces anything wins:
/// names, numbers, random intent, thanks, then tag scoring. The engine is
/// immutable after construction; a catalog reload builds a new engine and
/// swaps it in whole.
pub struct Engine {
    catalog: Arc<Catalog>,
    config: Arc<SearchConfig>,
    analyzer: Box<dyn Analyzer>,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>, config: Arc<SearchConfig>) -> Self {
        Self {
            catalog,
            config,
            analyzer: Box::new(EnglishAnalyzer::new()),
        }
    }

    /// Swap in a different tagger/stemmer pair.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the pipeline and report which stage answered, with the matched
    /// catalog positions. `Random` carries its single pick; `Gratitude`
    /// and `NoMatch` carry none.
    pub fn search_positions(&self, query: &str) -> (ReplyKind, Vec<usize>) {
        let tokens = tokenize(query);
        log::debug!("Query {:?}: {} token(s)", query, tokens.len());

        let by_name = match_by_name(&self.catalog, &tokens);
        if !by_name.is_empty() {
            return (ReplyKind::NameMatch, by_name);
        }

        let by_number = match_by_number(&self.catalog, &tokens);
        if !by_number.is_empty() {
            return (ReplyKind::NumberMatch, by_number);
        }

        if is_random_request(&tokens) {
            let mut rng = rand::thread_rng();
            let pick = self.catalog.random_position(&mut rng);
            return (ReplyKind::Random, pick.into_iter().collect());
        }

        if is_gratitude(&tokens, &self.config.thank_keywords) {
            return (ReplyKind::Gratitude, Vec::new());
        }

        let by_tags = score_by_tags(&self.catalog, &self.config, self.analyzer.as_ref(), &tokens);
        if !by_tags.is_empty() {
            return (ReplyKind::TagMatch, by_tags);
        }

        (ReplyKind::NoMatch, Vec::new())
    }

    /// Answer a free-text query with a ready-to-send reply.
    pub fn search(&self, query: &str) -> Reply {
        let (kind, positions) = self.search_positions(query);
        match kind {
            ReplyKind::Random => random_reply(&self.catalog, &self.config, &positions),
            ReplyKind::Gratitude => gratitude_reply(&self.config, &mut rand::thread_rng()),
            ReplyKind::NoMatch => no_match_reply(),
            _ => robot_list_reply(&self.catalog, &self.config, kind, &positions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smolbot_catalog::Robot;

    fn engine() -> Engine {
        let catalog = Catalog::from_robots(vec![
            Robot::new(207, "Teabot", "100").with_tags(["tea", "drink", "cup"]),
            Robot::new(84, "Superspeedybot", "101").with_tags(["fast", "zoom"]),
            Robot::new(3, "Pancake", "102").with_tags(["breakfast", "syrup"]),
            Robot::new(55, "Coffeebot", "103").with_tags(["coffee", "drink", "cup"]),
        ])
        .expect("unique numbers");
        Engine::new(Arc::new(catalog), Arc::new(SearchConfig::default()))
    }

    #[test]
    fn name_match_wins_over_everything() {
        let engine = engine();
        // "tea" is also a tag; the name stage answers first.
        let (kind, positions) = engine.search_positions("teabot please");
        assert_eq!(kind, ReplyKind::NameMatch);
        assert_eq!(positions, vec![0]);
    }

    #[test]
    fn number_match_runs_after_names() {
        let engine = engine();
        let (kind, positions) = engine.search_positions("do you have 84?");
        assert_eq!(kind, ReplyKind::NumberMatch);
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn random_short_circuits_thanks_and_tags() {
        let engine = engine();
        let (kind, positions) = engine.search_positions("thanks, show a random robot");
        assert_eq!(kind, ReplyKind::Random);
        assert_eq!(positions.len(), 1);
        assert!(positions[0] < 4);
    }

    #[test]
    fn gratitude_runs_before_tag_scoring() {
        let engine = engine();
        let (kind, positions) = engine.search_positions("thanks for the tea!");
        assert_eq!(kind, ReplyKind::Gratitude);
        assert!(positions.is_empty());
        let reply = engine.search("thanks!");
        assert!(engine.config().welcome_phrases.contains(&reply.text));
    }

    #[test]
    fn tag_scoring_is_the_fallback_stage() {
        let engine = engine();
        let (kind, positions) = engine.search_positions("is there a breakfast robot?");
        assert_eq!(kind, ReplyKind::TagMatch);
        assert_eq!(positions, vec![2]);
    }

    #[test]
    fn unanswerable_queries_apologize() {
        let engine = engine();
        let reply = engine.search("qwyjibo flurble");
        assert_eq!(reply.kind, ReplyKind::NoMatch);
        assert!(reply.text.starts_with("Sorry, I couldn't find the robot"));
    }

    #[test]
    fn full_pipeline_formats_name_matches() {
        let engine = engine();
        let reply = engine.search("where is teabot?");
        assert_eq!(reply.kind, ReplyKind::NameMatch);
        assert_eq!(reply.text, "I found #207 Teabot");
    }

    #[test]
    fn number_queries_format_the_numbered_robot() {
        let engine = engine();
        let reply = engine.search("robot 3");
        assert_eq!(reply.kind, ReplyKind::NumberMatch);
        assert_eq!(reply.text, "I found #3 Pancake");
    }

    #[test]
    fn compound_names_match_through_the_name_stage() {
        let engine = engine();
        let (kind, positions) = engine.search_positions("the super speedy bot");
        assert_eq!(kind, ReplyKind::NameMatch);
        assert_eq!(positions, vec![1]);
    }

    #[test]
    fn random_on_an_empty_catalog_degrades_to_no_match() {
        let engine = Engine::new(
            Arc::new(Catalog::new()),
            Arc::new(SearchConfig::default()),
        );
        let reply = engine.search("random robot please");
        assert_eq!(reply.kind, ReplyKind::NoMatch);
    }
}
