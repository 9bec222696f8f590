//! Core types for the trivia minigame: questions, the question store, and
//! the attribute mini-language used by chat commands.
//!
//! This crate knows nothing about chat hosts or timers. The round state
//! machine lives in `trivia-bot`; here you construct a [`QuestionStore`]
//! programmatically or load one from its JSON document.

/// Key:value attribute extraction from free-form command strings.
pub mod attribute;
/// Error types used throughout the crate.
pub mod error;
/// Narrowing the question pool to a detected game.
pub mod filter;
/// The question record.
pub mod question;
/// The question store and its filtered pool.
pub mod store;

pub use attribute::{AttributeError, AttributeParser};
pub use error::{StoreError, StoreResult};
pub use filter::GameFilter;
pub use question::Question;
pub use store::QuestionStore;
