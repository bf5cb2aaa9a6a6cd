use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{CatalogError, Result};
use crate::robot::Robot;

/// Strip one trailing `bot` or `bots` from a name. `bots` wins when both
/// apply, so `teabots` becomes `tea`, not `teas`.
pub fn strip_bot_suffix(name: &str) -> &str {
    if let Some(stripped) = name.strip_suffix("bots") {
        stripped
    } else if let Some(stripped) = name.strip_suffix("bot") {
        stripped
    } else {
        name
    }
}

/// Canonical name-index key: lowercased, one trailing `bot`/`bots`
/// stripped. A name that is nothing but the suffix keeps its lowercase
/// form, so a robot literally called "Bot" stays addressable.
pub fn name_key(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = strip_bot_suffix(&lowered);
    if stripped.is_empty() {
        lowered
    } else {
        stripped.to_string()
    }
}

/// The robot dataset plus derived lookup indices.
///
/// Lookups hand back positions into the underlying sequence rather than
/// references, so callers can collect, dedup and rank them cheaply. The
/// indices are rebuilt whole whenever the sequence changes; `&self`
/// lookups never observe a partially built index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    robots: Vec<Robot>,
    by_name: HashMap<String, Vec<usize>>,
    by_number: HashMap<i64, usize>,
    by_tag: HashMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a robot sequence. Fails on the first duplicate
    /// number; robot numbers are the one identity the dataset guarantees.
    pub fn from_robots(robots: Vec<Robot>) -> Result<Self> {
        let mut catalog = Self {
            robots,
            ..Self::default()
        };
        catalog.rebuild_indices()?;
        Ok(catalog)
    }

    /// Append one robot and refresh the indices.
    pub fn push(&mut self, robot: Robot) -> Result<usize> {
        if self.by_number.contains_key(&robot.number) {
            return Err(CatalogError::DuplicateNumber(robot.number));
        }
        self.robots.push(robot);
        self.rebuild_indices()?;
        Ok(self.robots.len() - 1)
    }

    fn rebuild_indices(&mut self) -> Result<()> {
        self.by_name.clear();
        self.by_number.clear();
        self.by_tag.clear();
        for (position, robot) in self.robots.iter().enumerate() {
            if self.by_number.insert(robot.number, position).is_some() {
                return Err(CatalogError::DuplicateNumber(robot.number));
            }
            self.by_name
                .entry(name_key(&robot.name))
                .or_default()
                .push(position);
            for tag in &robot.tags {
                self.by_tag.entry(tag.clone()).or_default().push(position);
            }
        }
        Ok(())
    }

    /// Positions of robots whose canonical name key equals `key` exactly.
    /// Callers are expected to pass already-normalized text.
    pub fn get_by_name(&self, key: &str) -> &[usize] {
        self.by_name.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_by_number(&self, number: i64) -> Option<usize> {
        self.by_number.get(&number).copied()
    }

    /// Positions of robots carrying `tag` verbatim.
    pub fn get_by_tag(&self, tag: &str) -> &[usize] {
        self.by_tag.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        if self.robots.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.robots.len()))
        }
    }

    pub fn get(&self, position: usize) -> Option<&Robot> {
        self.robots.get(position)
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Robot> {
        self.robots.iter()
    }

    pub fn len(&self) -> usize {
        self.robots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.robots.is_empty()
    }

    /// Load a catalog from a JSON file (an array of robots).
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let robots: Vec<Robot> = serde_json::from_slice(&bytes)?;
        let catalog = Self::from_robots(robots)?;
        log::debug!(
            "Loaded {} robots from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Persist the robot sequence as pretty JSON. Writes to a sibling
    /// `.tmp` file first and renames over the target, so readers see
    /// either the old catalog or the new one, never a torn write.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let bytes = serde_json::to_vec_pretty(&self.robots)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|source| CatalogError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        Catalog::from_robots(vec![
            Robot::new(1, "Teabot", "100").with_tags(["tea", "drink"]),
            Robot::new(2, "Mugbot", "101").with_tags(["mug", "drink"]),
            Robot::new(3, "Superspeedybot", "102").with_tags(["fast"]),
        ])
        .expect("unique numbers")
    }

    #[test]
    fn name_key_strips_one_bot_suffix() {
        assert_eq!(name_key("Teabot"), "tea");
        assert_eq!(name_key("Teabots"), "tea");
        assert_eq!(name_key("Pancake"), "pancake");
        assert_eq!(name_key("Robotbot"), "robot");
    }

    #[test]
    fn name_key_keeps_suffix_only_names() {
        assert_eq!(name_key("Bot"), "bot");
        assert_eq!(name_key("Bots"), "bots");
    }

    #[test]
    fn lookups_resolve_positions() {
        let catalog = sample();
        assert_eq!(catalog.get_by_name("tea"), &[0]);
        assert_eq!(catalog.get_by_name("superspeedy"), &[2]);
        assert_eq!(catalog.get_by_name("nope"), &[] as &[usize]);
        assert_eq!(catalog.get_by_number(2), Some(1));
        assert_eq!(catalog.get_by_number(99), None);
        assert_eq!(catalog.get_by_tag("drink"), &[0, 1]);
    }

    #[test]
    fn push_rejects_duplicate_numbers() {
        let mut catalog = sample();
        let err = catalog.push(Robot::new(2, "Copybot", "103")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateNumber(2)));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn push_updates_indices() {
        let mut catalog = sample();
        let position = catalog
            .push(Robot::new(4, "Pancakebot", "104").with_tags(["breakfast"]))
            .expect("new number");
        assert_eq!(position, 3);
        assert_eq!(catalog.get_by_name("pancake"), &[3]);
        assert_eq!(catalog.get_by_tag("breakfast"), &[3]);
    }

    #[test]
    fn from_robots_rejects_duplicate_numbers() {
        let err = Catalog::from_robots(vec![
            Robot::new(7, "Teabot", "100"),
            Robot::new(7, "Copybot", "101"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateNumber(7)));
    }

    #[test]
    fn random_position_is_none_on_empty() {
        let catalog = Catalog::new();
        let mut rng = rand::thread_rng();
        assert_eq!(catalog.random_position(&mut rng), None);
    }

    #[test]
    fn random_position_is_in_range() {
        let catalog = sample();
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let position = catalog.random_position(&mut rng).expect("non-empty");
            assert!(position < catalog.len());
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("robots.json");

        let catalog = sample();
        catalog.save(&path).expect("save");
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = Catalog::load(&path).expect("load");
        assert_eq!(loaded.robots(), catalog.robots());
        assert_eq!(loaded.get_by_name("mug"), &[1]);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let err = Catalog::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
