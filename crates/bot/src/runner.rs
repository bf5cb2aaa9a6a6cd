use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use smolbot_catalog::{parse_announcement, Catalog};
use smolbot_search::{Engine, SearchConfig};

use crate::commands::{parse_admin_command, AdminCommand};
use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::phrases::PhraseBook;
use crate::state::{DailyCursor, ReplyLog};
use crate::transport::{smarten_quotes, Message, Transport};

const MENTION_LOG_FILE: &str = "responded-mentions.txt";
const DIRECT_LOG_FILE: &str = "responded-directs.txt";
const DAILY_CURSOR_FILE: &str = "daily-cursor.json";

const DAY_SECS: u64 = 24 * 60 * 60;

/// The bot's main loop: polls the transport on its configured cadences,
/// answers through the search engine, ingests announcements, and posts
/// the daily robot.
///
/// The runner is single-threaded over `&mut self`; a catalog change
/// builds a fresh snapshot and swaps engine and catalog together, so no
/// tick ever observes a half-updated pair.
pub struct Runner<T: Transport> {
    transport: T,
    engine: Engine,
    catalog: Arc<Catalog>,
    search_config: Arc<SearchConfig>,
    bot: BotConfig,
    phrases: PhraseBook,
    mention_log: ReplyLog,
    direct_log: ReplyLog,
    daily: DailyCursor,
    stopping: bool,
}

impl<T: Transport> Runner<T> {
    pub fn new(
        transport: T,
        catalog: Arc<Catalog>,
        search_config: Arc<SearchConfig>,
        bot: BotConfig,
        phrases: PhraseBook,
    ) -> Result<Self> {
        fs::create_dir_all(&bot.state_dir).map_err(|source| BotError::Io {
            path: bot.state_dir.clone(),
            source,
        })?;
        let mention_log = ReplyLog::load(
            &bot.state_dir.join(MENTION_LOG_FILE),
            bot.reply_log_capacity,
        )?;
        let direct_log = ReplyLog::load(
            &bot.state_dir.join(DIRECT_LOG_FILE),
            bot.reply_log_capacity,
        )?;
        let daily = DailyCursor::load(&bot.state_dir.join(DAILY_CURSOR_FILE))?;
        let engine = Engine::new(Arc::clone(&catalog), Arc::clone(&search_config));

        Ok(Self {
            transport,
            engine,
            catalog,
            search_config,
            bot,
            phrases,
            mention_log,
            direct_log,
            daily,
            stopping: false,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    /// Drive all ticks until an admin `$stop` or an interrupt.
    pub async fn run(mut self) -> Result<()> {
        let mut mention_ticks =
            tokio::time::interval(Duration::from_secs(self.bot.mention_poll_secs.max(1)));
        let mut direct_ticks =
            tokio::time::interval(Duration::from_secs(self.bot.dm_poll_secs.max(1)));
        let mut ingest_ticks =
            tokio::time::interval(Duration::from_secs(self.bot.ingest_poll_secs.max(1)));
        let daily = tokio::time::sleep(next_daily_delay(self.bot.daily_post_hour));
        tokio::pin!(daily);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        log::info!(
            "Bot runner started: {} robots indexed, watching @{}",
            self.catalog.len(),
            self.bot.account
        );

        while !self.stopping {
            tokio::select! {
                _ = mention_ticks.tick() => self.check_mentions().await,
                _ = direct_ticks.tick() => self.check_direct_messages().await,
                _ = ingest_ticks.tick() => self.check_new_robots().await,
                () = &mut daily => {
                    self.post_daily_robot().await;
                    daily.as_mut().reset(
                        tokio::time::Instant::now()
                            + next_daily_delay(self.bot.daily_post_hour),
                    );
                }
                _ = &mut ctrl_c => {
                    log::info!("Interrupt received, stopping");
                    self.stopping = true;
                }
            }
        }

        self.persist_state();
        log::info!("Bot runner stopped");
        Ok(())
    }

    /// Answer unanswered mentions through the engine.
    pub async fn check_mentions(&mut self) {
        let mentions = match self.transport.poll_mentions(self.bot.mention_limit).await {
            Ok(mentions) => mentions,
            Err(err) => {
                log::warn!("Mention poll failed: {err}");
                return;
            }
        };

        let mut replied = false;
        for mention in mentions {
            if self.mention_log.contains(&mention.id) {
                continue;
            }
            let reply = self.engine.search(&mention.text);
            match self.transport.reply(&mention, &reply.text).await {
                Ok(()) => {
                    log::info!("Replied to mention {} ({:?})", mention.id, reply.kind);
                    self.mention_log.record(mention.id);
                    replied = true;
                }
                Err(err) => log::warn!("Reply to mention {} failed: {err}", mention.id),
            }
        }
        if replied {
            self.save_log(&self.mention_log, MENTION_LOG_FILE);
        }
    }

    /// Answer unanswered direct messages; admins get the command channel.
    pub async fn check_direct_messages(&mut self) {
        let directs = match self.transport.poll_direct_messages().await {
            Ok(directs) => directs,
            Err(err) => {
                log::warn!("Direct message poll failed: {err}");
                return;
            }
        };

        let mut replied = false;
        for message in directs {
            if self.direct_log.contains(&message.id) {
                continue;
            }
            let outgoing = self.direct_response(&message);
            match self
                .transport
                .send_direct(&message.sender, &smarten_quotes(&outgoing))
                .await
            {
                Ok(()) => {
                    log::info!("Answered direct message {}", message.id);
                    self.direct_log.record(message.id);
                    replied = true;
                }
                Err(err) => log::warn!("Direct message to {} failed: {err}", message.sender),
            }
        }
        if replied {
            self.save_log(&self.direct_log, DIRECT_LOG_FILE);
        }
    }

    fn direct_response(&mut self, message: &Message) -> String {
        if self.bot.admin_ids.contains(&message.sender) {
            if let Some(command) = parse_admin_command(&message.text) {
                log::info!("Admin command from {}: {:?}", message.sender, command);
                return self.handle_admin(command);
            }
        }
        self.engine.search(&message.text).text
    }

    fn handle_admin(&mut self, command: AdminCommand) -> String {
        match command {
            AdminCommand::ReloadRobots => match self.reload_catalog() {
                Ok(count) => format!("Loaded {count} robots"),
                Err(err) => format!("Reload failed: {err}"),
            },
            AdminCommand::ReloadPhrases => {
                self.phrases = PhraseBook::load(&self.bot.data_dir);
                "Reloaded phrases".to_string()
            }
            AdminCommand::Stop => {
                self.stopping = true;
                "Stopping at end current loop".to_string()
            }
            AdminCommand::Unknown => "Unrecognised command".to_string(),
        }
    }

    /// Scan the watched feed for announcement posts and index the robots
    /// they introduce.
    pub async fn check_new_robots(&mut self) {
        let posts = match self
            .transport
            .recent_posts(self.bot.ingest_window_secs)
            .await
        {
            Ok(posts) => posts,
            Err(err) => {
                log::warn!("Feed scan failed: {err}");
                return;
            }
        };
        log::debug!(
            "Scanning {} recent post(s) from @{} for announcements",
            posts.len(),
            self.bot.account
        );

        let mut catalog = (*self.catalog).clone();
        let mut added = 0usize;
        for post in posts {
            let Some(robot) = parse_announcement(&post.text, &post.id) else {
                continue;
            };
            if catalog.get_by_number(robot.number).is_some() {
                continue;
            }
            log::info!("Registered a new robot: #{} {}", robot.number, robot.name);
            match catalog.push(robot) {
                Ok(_) => added += 1,
                Err(err) => log::warn!("Could not index announcement {}: {err}", post.id),
            }
        }

        if added > 0 {
            if let Err(err) = catalog.save(&self.bot.catalog_path) {
                log::warn!("Could not save the catalog: {err}");
            }
            self.install_catalog(catalog);
            log::info!("Indexed {added} new robot(s), {} total", self.catalog.len());
        }
    }

    /// Post the next robot in rotation. The cursor only moves when the
    /// post goes out, so a failed attempt retries the same robot.
    pub async fn post_daily_robot(&mut self) {
        let mut cursor = self.daily;
        let Some(position) = cursor.advance(self.catalog.len()) else {
            log::warn!("Daily post skipped, catalog is empty");
            return;
        };
        let Some(robot) = self.catalog.get(position) else {
            return;
        };

        let (greeting, intro) = {
            let mut rng = rand::thread_rng();
            (
                self.phrases.random_greeting(&mut rng).to_string(),
                self.phrases.random_intro(&mut rng).to_string(),
            )
        };
        let date = Utc::now().format("%d/%m/%y");
        let mut text = format!("{date}\n{greeting} {intro} {}!", robot.name);
        if let Some(link) = robot.source_link(self.search_config.link_base.as_deref()) {
            text.push_str(&link);
        }

        match self.transport.post(&text).await {
            Ok(()) => {
                log::info!("Posted the daily robot: #{} {}", robot.number, robot.name);
                self.daily = cursor;
                if let Err(err) = self.daily.save(&self.bot.state_dir.join(DAILY_CURSOR_FILE)) {
                    log::warn!("Could not save the daily cursor: {err}");
                }
            }
            Err(err) => log::warn!("Daily post failed: {err}"),
        }
    }

    fn reload_catalog(&mut self) -> Result<usize> {
        let catalog = Catalog::load(&self.bot.catalog_path)?;
        let count = catalog.len();
        self.install_catalog(catalog);
        Ok(count)
    }

    fn install_catalog(&mut self, catalog: Catalog) {
        let catalog = Arc::new(catalog);
        self.catalog = Arc::clone(&catalog);
        self.engine = Engine::new(catalog, Arc::clone(&self.search_config));
    }

    fn save_log(&self, log: &ReplyLog, file: &str) {
        if let Err(err) = log.save(&self.bot.state_dir.join(file)) {
            log::warn!("Could not save {file}: {err}");
        }
    }

    fn persist_state(&self) {
        self.save_log(&self.mention_log, MENTION_LOG_FILE);
        self.save_log(&self.direct_log, DIRECT_LOG_FILE);
        if let Err(err) = self.daily.save(&self.bot.state_dir.join(DAILY_CURSOR_FILE)) {
            log::warn!("Could not save the daily cursor: {err}");
        }
    }
}

/// Time until the next `hour:00` UTC.
fn next_daily_delay(hour: u32) -> Duration {
    let now = Utc::now().naive_utc();
    let Some(today) = now.date().and_hms_opt(hour.min(23), 0, 0) else {
        return Duration::from_secs(DAY_SECS);
    };
    let target = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (target - now)
        .to_std()
        .unwrap_or(Duration::from_secs(DAY_SECS))
}
