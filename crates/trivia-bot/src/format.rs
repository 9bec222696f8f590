//! Template placeholder substitution for chat and display messages.

use chrono::TimeDelta;
use trivia_core::Question;

use crate::reward;

/// A `$token` recognised in message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// 1-based question index.
    Index,
    /// Loyalty currency name.
    Currency,
    /// Question text.
    Question,
    /// Each winner's share of the reward.
    PointsWon,
    /// Total reward of the round.
    Points,
    /// Accepted answers, comma-joined.
    Answers,
    /// Game the question is about.
    Game,
    /// Configured winner cap.
    WinnersPossible,
    /// Number of winners so far.
    WinnerCount,
    /// Winner names as a readable list.
    WinnerList,
    /// Time left before the question expires.
    TimeRemaining,
    /// Time left before the next question.
    Time,
}

impl Placeholder {
    /// Every placeholder, longest token first among shared prefixes.
    pub const ALL: [Self; 12] = [
        Self::Index,
        Self::Currency,
        Self::Question,
        Self::PointsWon,
        Self::Points,
        Self::Answers,
        Self::Game,
        Self::WinnersPossible,
        Self::WinnerCount,
        Self::WinnerList,
        Self::TimeRemaining,
        Self::Time,
    ];

    /// The token as written in templates.
    pub fn token(self) -> &'static str {
        match self {
            Self::Index => "$index",
            Self::Currency => "$currency",
            Self::Question => "$question",
            Self::PointsWon => "$pointswon",
            Self::Points => "$points",
            Self::Answers => "$answers",
            Self::Game => "$game",
            Self::WinnersPossible => "$winnerspossible",
            Self::WinnerCount => "$winnercount",
            Self::WinnerList => "$winnerlist",
            Self::TimeRemaining => "$timeremaining",
            Self::Time => "$time",
        }
    }
}

/// Live values available to a template.
#[derive(Debug, Clone, Default)]
pub struct FormatContext<'a> {
    /// 0-based pool index of the question.
    pub index: Option<usize>,
    /// Loyalty currency name.
    pub currency: &'a str,
    /// The question being asked or resolved.
    pub question: Option<&'a Question>,
    /// Total reward of the round.
    pub reward: u64,
    /// Winner display names, already in announcement order.
    pub winners: &'a [String],
    /// Configured winner cap.
    pub winners_possible: u32,
    /// Whether winners are paid at all.
    pub rewards_enabled: bool,
    /// Whether the reward is split between winners.
    pub dividing: bool,
    /// Time until the question expires.
    pub time_remaining: Option<TimeDelta>,
    /// Time until the next question.
    pub time_until_next: Option<TimeDelta>,
}

impl FormatContext<'_> {
    fn resolve(&self, placeholder: Placeholder) -> Option<String> {
        match placeholder {
            Placeholder::Index => self.index.map(|i| (i + 1).to_string()),
            Placeholder::Currency => Some(self.currency.to_string()),
            Placeholder::Question => self.question.map(|q| q.question.clone()),
            Placeholder::PointsWon => {
                if self.winners.is_empty() || !self.rewards_enabled {
                    Some("0".to_string())
                } else {
                    let each = reward::share(self.reward, self.winners.len(), self.dividing);
                    Some(each.to_string())
                }
            }
            Placeholder::Points => Some(self.reward.to_string()),
            Placeholder::Answers => self.question.map(|q| q.answers().join(", ")),
            Placeholder::Game => self.question.map(|q| q.game.clone()),
            Placeholder::WinnersPossible => Some(self.winners_possible.to_string()),
            Placeholder::WinnerCount => Some(self.winners.len().to_string()),
            Placeholder::WinnerList => format_winner_list(self.winners),
            Placeholder::TimeRemaining => self.time_remaining.map(format_clock),
            Placeholder::Time => self.time_until_next.map(format_clock),
        }
    }
}

/// Substitute every placeholder in `template`.
///
/// Unknown tokens and tokens without data stay as written.
pub fn render(template: &str, ctx: &FormatContext<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let hit = Placeholder::ALL
            .iter()
            .find(|p| tail.starts_with(p.token()))
            .map(|&p| (p, ctx.resolve(p)));
        match hit {
            Some((p, Some(value))) => {
                out.push_str(&value);
                rest = &tail[p.token().len()..];
            }
            Some((p, None)) => {
                out.push_str(p.token());
                rest = &tail[p.token().len()..];
            }
            None => {
                out.push('$');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Join names as "A", "A and B" or "A, B, and C".
pub fn format_winner_list(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [one] => Some(one.clone()),
        [a, b] => Some(format!("{a} and {b}")),
        [init @ .., last] => Some(format!("{}, and {last}", init.join(", "))),
    }
}

/// Format a duration as `MM:SS`, clamped at zero.
pub fn format_clock(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
