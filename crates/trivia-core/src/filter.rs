use crate::question::Question;

/// Restricts the active question pool to a single game.
///
/// With no game set every question passes. Game titles are compared
/// case-insensitively after trimming, since detected titles and typed
/// titles rarely agree on capitalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    game: Option<String>,
}

impl GameFilter {
    /// A filter that accepts every question.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter that accepts only questions about `game`.
    pub fn game(game: impl Into<String>) -> Self {
        Self {
            game: Some(game.into()),
        }
    }

    /// The game being filtered on, if any.
    pub fn current_game(&self) -> Option<&str> {
        self.game.as_deref()
    }

    /// Whether a filter is in effect.
    pub fn is_active(&self) -> bool {
        self.game.is_some()
    }

    /// Whether `question` belongs in the pool.
    pub fn accepts(&self, question: &Question) -> bool {
        match &self.game {
            None => true,
            Some(game) => question.game.trim().eq_ignore_ascii_case(game.trim()),
        }
    }
}
