//! The collaborator interface the chat-bot host provides.

use thiserror::Error;

/// A chat message as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Stable user id, used for permissions and payouts.
    pub user_id: String,
    /// Name shown in chat.
    pub display_name: String,
    /// Raw message text.
    pub text: String,
}

impl ChatMessage {
    /// Create a chat message.
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            text: text.into(),
        }
    }
}

/// A failed HTTP request made through the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed: {0}")]
pub struct RequestError(pub String);

/// Services the host runtime exposes to the minigame.
pub trait Host {
    /// Whether `user_id` holds the named permission tier.
    fn has_permission(&self, user_id: &str, tier: &str) -> bool;

    /// Whether the stream is currently live.
    fn is_live(&self) -> bool;

    /// Name of the loyalty currency.
    fn currency_name(&self) -> String;

    /// Pay `amount` to a user. Returns false if the host refused.
    fn add_points(&mut self, user_id: &str, display_name: &str, amount: u64) -> bool;

    /// Post a message to chat.
    fn send_message(&mut self, text: &str);

    /// Perform an HTTP GET and return the body.
    fn get_request(&mut self, url: &str) -> Result<String, RequestError>;
}
