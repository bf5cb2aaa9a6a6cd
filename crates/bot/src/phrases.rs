use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

/// Bundled fallbacks; the data directory overrides them when present.
const BUILTIN_GREETINGS: &str = include_str!("../../../data/greetings.txt");
const BUILTIN_INTROS: &str = include_str!("../../../data/intros.txt");

/// Visible sentinel for a phrase file that parsed to nothing. Posting it
/// is preferable to crashing the scheduler or posting an empty line.
const EMPTY_FILE_SENTINEL: &str = "[INTERNAL ERROR]";

const GREETINGS_FILE: &str = "greetings.txt";
const INTROS_FILE: &str = "intros.txt";

/// Greeting and introduction lines for the daily robot post, reloadable
/// from the data directory at runtime.
#[derive(Debug, Clone)]
pub struct PhraseBook {
    greetings: Vec<String>,
    intros: Vec<String>,
}

impl PhraseBook {
    pub fn builtin() -> Self {
        Self {
            greetings: parse_phrases(BUILTIN_GREETINGS),
            intros: parse_phrases(BUILTIN_INTROS),
        }
    }

    /// Load both phrase files from `data_dir`. A missing file falls back
    /// to the bundled lines with a warning; an unreadable one does too.
    pub fn load(data_dir: &Path) -> Self {
        Self {
            greetings: load_file(&data_dir.join(GREETINGS_FILE), BUILTIN_GREETINGS),
            intros: load_file(&data_dir.join(INTROS_FILE), BUILTIN_INTROS),
        }
    }

    pub fn random_greeting<R: Rng>(&self, rng: &mut R) -> &str {
        pick(&self.greetings, rng)
    }

    pub fn random_intro<R: Rng>(&self, rng: &mut R) -> &str {
        pick(&self.intros, rng)
    }
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self::builtin()
    }
}

fn pick<'a, R: Rng>(phrases: &'a [String], rng: &mut R) -> &'a str {
    phrases
        .choose(rng)
        .map(String::as_str)
        .unwrap_or(EMPTY_FILE_SENTINEL)
}

fn load_file(path: &Path, builtin: &str) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(text) => parse_phrases(&text),
        Err(err) => {
            log::warn!(
                "Phrase file {} not readable ({err}), using builtin lines",
                path.display()
            );
            parse_phrases(builtin)
        }
    }
}

/// One phrase per line; blank lines skipped. An empty result degrades to
/// the sentinel instead of an empty pool.
fn parse_phrases(text: &str) -> Vec<String> {
    let phrases: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    if phrases.is_empty() {
        vec![EMPTY_FILE_SENTINEL.to_string()]
    } else {
        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_phrases_are_present() {
        let book = PhraseBook::builtin();
        let mut rng = rand::thread_rng();
        assert!(!book.random_greeting(&mut rng).is_empty());
        assert!(!book.random_intro(&mut rng).is_empty());
    }

    #[test]
    fn data_dir_files_override_builtins() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("greetings.txt"), "Ahoy!\n").expect("write");
        std::fs::write(dir.path().join("intros.txt"), "Meet\n").expect("write");

        let book = PhraseBook::load(dir.path());
        let mut rng = rand::thread_rng();
        assert_eq!(book.random_greeting(&mut rng), "Ahoy!");
        assert_eq!(book.random_intro(&mut rng), "Meet");
    }

    #[test]
    fn missing_files_fall_back_to_builtins() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let book = PhraseBook::load(dir.path());
        let mut rng = rand::thread_rng();
        assert_ne!(book.random_greeting(&mut rng), EMPTY_FILE_SENTINEL);
    }

    #[test]
    fn empty_files_surface_the_sentinel() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("greetings.txt"), "\n\n").expect("write");

        let book = PhraseBook::load(dir.path());
        let mut rng = rand::thread_rng();
        assert_eq!(book.random_greeting(&mut rng), EMPTY_FILE_SENTINEL);
    }
}
