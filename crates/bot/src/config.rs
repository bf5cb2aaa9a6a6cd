use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use smolbot_search::SearchOverrides;

use crate::error::{BotError, Result};
use crate::transport::CONSOLE_SENDER;

/// Cadences, identities and paths for the bot runner.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Account whose feed is scanned for announcements (for logs/links).
    pub account: String,
    /// Senders allowed to issue `$` commands over direct messages.
    pub admin_ids: Vec<String>,
    pub mention_poll_secs: u64,
    pub dm_poll_secs: u64,
    pub ingest_poll_secs: u64,
    /// Lookback window handed to the transport when scanning the feed.
    pub ingest_window_secs: u64,
    /// Hour of day (UTC) for the daily robot post.
    pub daily_post_hour: u32,
    /// Most mentions fetched per poll.
    pub mention_limit: usize,
    pub reply_log_capacity: usize,
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
    pub catalog_path: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            account: "smolrobots".to_string(),
            admin_ids: vec![CONSOLE_SENDER.to_string()],
            mention_poll_secs: 15,
            dm_poll_secs: 60,
            ingest_poll_secs: 3600,
            ingest_window_secs: 10800,
            daily_post_hour: 7,
            mention_limit: 20,
            reply_log_capacity: 20,
            data_dir: PathBuf::from("data"),
            state_dir: PathBuf::from("state"),
            catalog_path: PathBuf::from("data/robots.json"),
        }
    }
}

/// Optional knobs from the `[bot]` table of the config file.
#[derive(Debug, Default, Deserialize)]
pub struct BotOverrides {
    pub account: Option<String>,
    pub admin_ids: Option<Vec<String>>,
    pub mention_poll_secs: Option<u64>,
    pub dm_poll_secs: Option<u64>,
    pub ingest_poll_secs: Option<u64>,
    pub ingest_window_secs: Option<u64>,
    pub daily_post_hour: Option<u32>,
    pub mention_limit: Option<usize>,
    pub reply_log_capacity: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

impl BotConfig {
    pub fn from_overrides(overrides: BotOverrides) -> Self {
        let defaults = Self::default();
        Self {
            account: overrides.account.unwrap_or(defaults.account),
            admin_ids: overrides.admin_ids.unwrap_or(defaults.admin_ids),
            mention_poll_secs: overrides
                .mention_poll_secs
                .unwrap_or(defaults.mention_poll_secs),
            dm_poll_secs: overrides.dm_poll_secs.unwrap_or(defaults.dm_poll_secs),
            ingest_poll_secs: overrides
                .ingest_poll_secs
                .unwrap_or(defaults.ingest_poll_secs),
            ingest_window_secs: overrides
                .ingest_window_secs
                .unwrap_or(defaults.ingest_window_secs),
            daily_post_hour: overrides
                .daily_post_hour
                .unwrap_or(defaults.daily_post_hour)
                .min(23),
            mention_limit: overrides.mention_limit.unwrap_or(defaults.mention_limit),
            reply_log_capacity: overrides
                .reply_log_capacity
                .unwrap_or(defaults.reply_log_capacity),
            data_dir: overrides.data_dir.unwrap_or(defaults.data_dir),
            state_dir: overrides.state_dir.unwrap_or(defaults.state_dir),
            catalog_path: overrides.catalog_path.unwrap_or(defaults.catalog_path),
        }
    }
}

/// The whole `smolbot.toml`: a `[search]` table and a `[bot]` table, both
/// optional, both merged over defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub search: SearchOverrides,
    #[serde(default)]
    pub bot: BotOverrides,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }
}
