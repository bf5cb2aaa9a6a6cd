//! Bot runtime: transport polling, reply bookkeeping, announcement
//! ingestion, scheduled posts, and the admin command channel.
//!
//! The crate is transport-agnostic. [`Transport`] is the seam; the
//! bundled [`ConsoleTransport`] drives the bot from stdin for local
//! use, and the [`Runner`] owns the polling loop on top of whichever
//! transport it is given.

pub mod commands;
pub mod config;
pub mod error;
pub mod phrases;
pub mod runner;
pub mod state;
pub mod transport;

pub use commands::{parse_admin_command, AdminCommand};
pub use config::{BotConfig, BotOverrides, ConfigFile};
pub use error::{BotError, Result};
pub use phrases::PhraseBook;
pub use runner::Runner;
pub use state::{DailyCursor, ReplyLog};
pub use transport::{
    smarten_quotes, ConsoleTransport, FeedPost, Message, Transport, CONSOLE_SENDER,
};
