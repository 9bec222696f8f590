//! Trivia minigame engine for livestream chat bots.
//!
//! The host runtime feeds chat messages to [`TriviaBot::execute`] and timer
//! ticks to [`TriviaBot::tick`]; the bot asks questions, collects winners,
//! pays out through the [`Host`] and keeps the question store on disk.

pub mod bot;
pub mod detect;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod format;
pub mod host;
pub mod reward;
pub mod round;
pub mod settings;

pub use bot::TriviaBot;
pub use dispatch::{Command, parse_command};
pub use error::{BotError, BotResult};
pub use host::{ChatMessage, Host, RequestError};
pub use round::{RoundState, Winner};
pub use settings::{BotPaths, LogLevel, RewardScaling, Settings};
