//! Looking up the game a channel is currently streaming.

use tracing::{debug, error};

use crate::error::{BotError, BotResult};
use crate::host::Host;

/// Endpoint returning the current game of a channel.
pub const GAME_API_URL: &str = "https://decapi.me/twitch/game/";

/// Ask the host to fetch the game `channel` is playing.
pub fn detect_game(host: &mut dyn Host, channel: &str) -> BotResult<String> {
    let channel = channel.trim();
    if channel.is_empty() {
        error!("game detection is enabled but no channel name is set");
        return Err(BotError::Configuration(
            "game detection requires a channel name".to_string(),
        ));
    }

    let url = format!("{GAME_API_URL}{channel}");
    let body = host
        .get_request(&url)
        .map_err(|e| BotError::Detection(e.to_string()))?;
    let game = parse_game_response(&body);
    debug!(channel, game = %game, "detected game");
    Ok(game)
}

/// Extract the game title from a response body.
///
/// Hosts wrap responses in a `{"response": ...}` envelope; a bare JSON
/// string or plain text body is also accepted.
pub fn parse_game_response(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("response") {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            _ => body.trim().to_string(),
        },
        Ok(serde_json::Value::String(s)) => s.trim().to_string(),
        _ => body.trim().to_string(),
    }
}
