use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BotError, Result};

/// Capacity-capped log of already-answered message ids, persisted one id
/// per line with the newest last. The cap keeps the file tiny; anything
/// old enough to fall off is also too old to show up in a poll again.
#[derive(Debug, Clone)]
pub struct ReplyLog {
    ids: VecDeque<String>,
    capacity: usize,
}

impl ReplyLog {
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn new(capacity: usize) -> Self {
        Self {
            ids: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    /// Record an answered id, dropping the oldest beyond capacity.
    pub fn record(&mut self, id: impl Into<String>) {
        self.ids.push_back(id.into());
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Load from `path`; a missing file is an empty log. Blank lines and
    /// surrounding whitespace are tolerated, ids are opaque otherwise.
    pub fn load(path: &Path, capacity: usize) -> Result<Self> {
        let mut log = Self::new(capacity);
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(log),
            Err(source) => {
                return Err(BotError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        for line in text.lines() {
            let id = line.trim();
            if !id.is_empty() {
                log.record(id);
            }
        }
        Ok(log)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut body = self
            .ids
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        body.push('\n');
        write_atomic(path, body.as_bytes())
    }
}

impl Default for ReplyLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

/// Rotation cursor for the daily robot post. Walks the catalog in order
/// and wraps, so every robot gets a day before any repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCursor {
    pub last_position: Option<usize>,
}

impl DailyCursor {
    /// Advance to the next catalog position. Also resets cleanly when the
    /// catalog shrank below the stored position.
    pub fn advance(&mut self, catalog_len: usize) -> Option<usize> {
        if catalog_len == 0 {
            return None;
        }
        let next = match self.last_position {
            Some(last) => (last + 1) % catalog_len,
            None => 0,
        };
        self.last_position = Some(next);
        Some(next)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(BotError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &bytes)
    }
}

/// Write via a sibling `.tmp` and rename, same discipline as the catalog.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| BotError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|source| BotError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| BotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
