use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use crate::error::Result;

/// An inbound message: a mention of the bot or a direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub text: String,
}

/// A post on the watched account's feed, scanned for robot announcements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    pub id: String,
    pub text: String,
}

/// The messaging side of the bot. The runner owns cadence, dedup and
/// persistence; a transport only moves messages. Polls may return
/// already-answered messages, the runner skips them by id.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn poll_mentions(&self, limit: usize) -> Result<Vec<Message>>;

    async fn poll_direct_messages(&self) -> Result<Vec<Message>>;

    async fn reply(&self, to: &Message, text: &str) -> Result<()>;

    async fn send_direct(&self, recipient: &str, text: &str) -> Result<()>;

    /// Publish on the bot's own feed (the daily robot).
    async fn post(&self, text: &str) -> Result<()>;

    /// Posts from the watched account within the lookback window, used by
    /// announcement ingestion.
    async fn recent_posts(&self, window_secs: u64) -> Result<Vec<FeedPost>>;
}

/// Typographic substitutions applied to direct-message sends.
pub fn smarten_quotes(text: &str) -> String {
    text.replace('\'', "\u{2019}").replace('"', "\u{201d}")
}

/// Interactive transport over stdin/stdout, mainly for local runs.
///
/// Each stdin line is delivered as a mention; lines starting with `$` are
/// delivered as direct messages from the sender `console`, which is how
/// admin commands are issued locally. The watched feed is empty.
pub struct ConsoleTransport {
    mentions: Mutex<mpsc::UnboundedReceiver<Message>>,
    directs: Mutex<mpsc::UnboundedReceiver<Message>>,
}

/// Sender name attached to console input.
pub const CONSOLE_SENDER: &str = "console";

impl ConsoleTransport {
    /// Spawn the stdin reader task and hand back the transport.
    pub fn spawn() -> Self {
        let (mention_tx, mention_rx) = mpsc::unbounded_channel();
        let (direct_tx, direct_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut next_id = 0u64;
            while let Ok(Some(line)) = lines.next_line().await {
                let text = line.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                next_id += 1;
                let message = Message {
                    id: format!("console-{next_id}"),
                    sender: CONSOLE_SENDER.to_string(),
                    text,
                };
                let delivered = if message.text.starts_with('$') {
                    direct_tx.send(message)
                } else {
                    mention_tx.send(message)
                };
                if delivered.is_err() {
                    break;
                }
            }
        });

        Self {
            mentions: Mutex::new(mention_rx),
            directs: Mutex::new(direct_rx),
        }
    }

    fn drain(receiver: &mut mpsc::UnboundedReceiver<Message>, limit: usize) -> Vec<Message> {
        let mut batch = Vec::new();
        while batch.len() < limit {
            match receiver.try_recv() {
                Ok(message) => batch.push(message),
                Err(_) => break,
            }
        }
        batch
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn poll_mentions(&self, limit: usize) -> Result<Vec<Message>> {
        let mut receiver = self.mentions.lock().await;
        Ok(Self::drain(&mut receiver, limit))
    }

    async fn poll_direct_messages(&self) -> Result<Vec<Message>> {
        let mut receiver = self.directs.lock().await;
        Ok(Self::drain(&mut receiver, usize::MAX))
    }

    async fn reply(&self, _to: &Message, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }

    async fn send_direct(&self, recipient: &str, text: &str) -> Result<()> {
        println!("[dm to {recipient}] {text}");
        Ok(())
    }

    async fn post(&self, text: &str) -> Result<()> {
        println!("[post]\n{text}");
        Ok(())
    }

    async fn recent_posts(&self, _window_secs: u64) -> Result<Vec<FeedPost>> {
        Ok(Vec::new())
    }
}
