//! Settings for the trivia minigame and the files it keeps on disk.
//!
//! The settings document is a flat JSON object. Unknown keys are ignored and
//! missing keys take their defaults, so documents written by older versions
//! keep loading. Durations and cooldowns are in minutes; the grace period is
//! in seconds.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::{error, level_filters::LevelFilter, warn};
use trivia_core::AttributeParser;

use crate::error::{BotError, BotResult};

/// Settings file name inside a bot directory.
pub const SETTINGS_FILE: &str = "settings.json";
/// Question store file name inside a bot directory.
pub const QUESTIONS_FILE: &str = "questions.json";
/// Overlay display file name inside a bot directory.
pub const DISPLAY_FILE: &str = "currentquestion.txt";
/// Log file name inside a bot directory.
pub const LOG_FILE: &str = "trivialog.txt";
/// Longest accepted duration, cooldown or grace period: one year.
pub const MAX_DURATION_SECS: f64 = 31_536_000.0;

/// How a round's reward is derived from the question's point value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardScaling {
    /// Award the stored point value.
    #[default]
    #[serde(alias = "Static", alias = "none", alias = "None")]
    Static,
    /// Multiply the stored value by a random percentage between the bounds.
    #[serde(alias = "Random")]
    Random,
}

/// Log verbosity, as chosen in the bot settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Everything, including trace output.
    All,
    /// Debug and above.
    Debug,
    /// Informational and above.
    Info,
    /// Warnings and failures.
    #[default]
    Warn,
    /// Only failures.
    Fatal,
    /// Nothing at all.
    Nothing,
}

impl LogLevel {
    /// The matching `tracing` filter.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::All => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Fatal => LevelFilter::ERROR,
            Self::Nothing => LevelFilter::OFF,
        }
    }
}

/// The full settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Only run while the stream is live.
    pub run_only_when_live: bool,
    /// Host permission tier allowed to play.
    pub permissions_players: String,
    /// Host permission tier allowed to run admin subcommands.
    pub permissions_admins: String,

    /// How long a question stays open, in minutes.
    pub duration_of_questions: f64,
    /// Pause between questions, in minutes.
    pub cooldown_between_questions: f64,
    /// Scale each cooldown by a random percentage.
    pub randomize_question_cooldown: bool,
    /// One end of the cooldown percentage range.
    pub question_cooldown_random_lower_bound: u32,
    /// The other end of the cooldown percentage range.
    pub question_cooldown_random_upper_bound: u32,
    /// Start the next question on its own once the cooldown ends.
    pub automatically_run_next_question: bool,
    /// Chat template used when a question is asked.
    pub question_ask_string: String,
    /// Chat template used when a question is won.
    pub question_reward_string: String,
    /// Chat template used when a question expires unanswered.
    pub question_expiration_string: String,
    /// Display file template while a question is open.
    pub question_file_ask_string: String,
    /// Display file template when a question is won.
    pub question_file_reward_string: String,
    /// Display file template when a question expires unanswered.
    pub question_file_expiration_string: String,

    /// Winners that end a round at once (0 = unlimited).
    pub number_of_winners: u32,
    /// Split the reward between winners instead of paying each in full.
    pub enable_points_dividing: bool,
    /// Pay winners at all.
    pub enable_loyalty_point_rewards: bool,
    /// Point value for questions added without one.
    pub default_loyalty_point_value: u64,
    /// Reward scaling mode.
    pub reward_scaling: RewardScaling,
    /// One end of the reward percentage range.
    pub point_value_random_lower_bound: u32,
    /// The other end of the reward percentage range.
    pub point_value_random_upper_bound: u32,
    /// Percent added to a question's value when nobody answers it.
    pub percent_loyalty_point_value_increase_on_unanswered: f64,
    /// Percent taken off a question's value when it is answered.
    pub percent_loyalty_point_value_decrease_on_answered: f64,
    /// Close the round shortly after the first correct answer.
    pub enable_grace_period: bool,
    /// Length of that grace period, in seconds.
    pub grace_period_duration_in_seconds: f64,

    /// Tell chatters when the next question arrives.
    pub display_next_question_time: bool,
    /// Write prompts to the overlay display file instead of chat.
    pub create_current_question_file: bool,
    /// Log verbosity.
    pub debug_level: LogLevel,
    /// Also write logs to the log file.
    pub enable_file_logging: bool,

    /// Restrict questions to the game the channel is playing.
    pub enable_game_detection: bool,
    /// Channel whose game is detected.
    pub twitch_channel_name: String,

    /// Characters that end an attribute value in `add`/`modify`.
    pub attribute_separators: String,
    /// Fixed RNG seed, for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_only_when_live: true,
            permissions_players: "Everyone".to_string(),
            permissions_admins: "Moderator".to_string(),

            duration_of_questions: 5.0,
            cooldown_between_questions: 5.0,
            randomize_question_cooldown: false,
            question_cooldown_random_lower_bound: 0,
            question_cooldown_random_upper_bound: 0,
            automatically_run_next_question: true,
            question_ask_string: "Win $points $currency by answering: $index) In $game, $question"
                .to_string(),
            question_reward_string:
                "$winnerlist answered correctly and won $pointswon $currency.".to_string(),
            question_expiration_string:
                "Nobody answered the previous question. The answers were: $answers.".to_string(),
            question_file_ask_string: "$timeremaining) In $game, $question".to_string(),
            question_file_reward_string:
                "$winnerlist answered correctly and won $pointswon $currency.".to_string(),
            question_file_expiration_string:
                "Nobody answered the previous question. The answers were: $answers.".to_string(),

            number_of_winners: 1,
            enable_points_dividing: true,
            enable_loyalty_point_rewards: true,
            default_loyalty_point_value: 10,
            reward_scaling: RewardScaling::Static,
            point_value_random_lower_bound: 0,
            point_value_random_upper_bound: 0,
            percent_loyalty_point_value_increase_on_unanswered: 0.0,
            percent_loyalty_point_value_decrease_on_answered: 0.0,
            enable_grace_period: false,
            grace_period_duration_in_seconds: 1.0,

            display_next_question_time: false,
            create_current_question_file: false,
            debug_level: LogLevel::Warn,
            enable_file_logging: false,

            enable_game_detection: false,
            twitch_channel_name: String::new(),

            attribute_separators: ",".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it is missing.
    pub fn load(path: &Path) -> BotResult<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(BotError::Configuration(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    /// Parse a settings document, as delivered by the host on reload.
    pub fn from_json(json: &str) -> BotResult<Self> {
        let body = json.trim_start_matches('\u{feff}');
        let settings: Self = serde_json::from_str(body)
            .map_err(|e| BotError::Configuration(format!("invalid settings: {e}")))?;
        Ok(settings.sanitized())
    }

    /// Write the settings document to `path`.
    pub fn save(&self, path: &Path) -> BotResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BotError::Configuration(format!("cannot encode settings: {e}")))?;
        fs::write(path, json).map_err(|source| {
            error!(path = %path.display(), error = %source, "failed to save settings");
            BotError::Persistence {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Clamp durations into `0..=MAX_DURATION_SECS`.
    pub fn sanitized(mut self) -> Self {
        let max_minutes = MAX_DURATION_SECS / 60.0;
        self.duration_of_questions = clamp(self.duration_of_questions, max_minutes);
        self.cooldown_between_questions = clamp(self.cooldown_between_questions, max_minutes);
        self.grace_period_duration_in_seconds =
            clamp(self.grace_period_duration_in_seconds, MAX_DURATION_SECS);
        self
    }

    /// How long a question stays open.
    pub fn question_duration(&self) -> TimeDelta {
        minutes(self.duration_of_questions)
    }

    /// Unscaled pause between questions.
    pub fn cooldown(&self) -> TimeDelta {
        minutes(self.cooldown_between_questions)
    }

    /// Grace period after the first correct answer.
    pub fn grace_period(&self) -> TimeDelta {
        seconds(self.grace_period_duration_in_seconds)
    }

    /// Parser configured with the attribute separators.
    pub fn attribute_parser(&self) -> AttributeParser {
        AttributeParser::new(self.attribute_separators.chars())
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the winner cap (0 = unlimited).
    pub fn with_winners(mut self, winners: u32) -> Self {
        self.number_of_winners = winners;
        self
    }

    /// Enable the grace period with the given length in seconds.
    pub fn with_grace_period(mut self, seconds: f64) -> Self {
        self.enable_grace_period = true;
        self.grace_period_duration_in_seconds = clamp(seconds, MAX_DURATION_SECS);
        self
    }

    /// Set whether the bot only runs while live.
    pub fn with_live_only(mut self, live_only: bool) -> Self {
        self.run_only_when_live = live_only;
        self
    }

    /// Set whether questions start on their own.
    pub fn with_auto_run(mut self, auto: bool) -> Self {
        self.automatically_run_next_question = auto;
        self
    }
}

/// Locations of the files a bot keeps. `None` keeps that part in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotPaths {
    /// Settings document.
    pub settings: Option<PathBuf>,
    /// Question store document.
    pub questions: Option<PathBuf>,
    /// Overlay display file.
    pub display: Option<PathBuf>,
    /// Log file.
    pub log: Option<PathBuf>,
}

impl BotPaths {
    /// The standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            settings: Some(dir.join(SETTINGS_FILE)),
            questions: Some(dir.join(QUESTIONS_FILE)),
            display: Some(dir.join(DISPLAY_FILE)),
            log: Some(dir.join(LOG_FILE)),
        }
    }

    /// Keep everything in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }
}

fn clamp(value: f64, max: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, max) }
}

fn minutes(value: f64) -> TimeDelta {
    seconds(value * 60.0)
}

fn seconds(value: f64) -> TimeDelta {
    TimeDelta::milliseconds((clamp(value, MAX_DURATION_SECS) * 1000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert!(s.run_only_when_live);
        assert_eq!(s.number_of_winners, 1);
        assert_eq!(s.default_loyalty_point_value, 10);
        assert_eq!(s.reward_scaling, RewardScaling::Static);
        assert_eq!(s.question_duration(), TimeDelta::minutes(5));
        assert_eq!(s.cooldown(), TimeDelta::minutes(5));
        assert_eq!(s.grace_period(), TimeDelta::seconds(1));
    }

    #[test]
    fn missing_keys_take_defaults_unknown_keys_ignored() {
        let s = Settings::from_json(
            r#"{"number_of_winners": 3, "reward_scaling": "Random", "made_up_key": 1}"#,
        )
        .unwrap();
        assert_eq!(s.number_of_winners, 3);
        assert_eq!(s.reward_scaling, RewardScaling::Random);
        assert_eq!(s.permissions_admins, "Moderator");
    }

    #[test]
    fn bom_is_tolerated() {
        let s = Settings::from_json("\u{feff}{\"debug_level\": \"Debug\"}").unwrap();
        assert_eq!(s.debug_level, LogLevel::Debug);
    }

    #[test]
    fn negative_durations_clamped() {
        let s = Settings::from_json(
            r#"{"duration_of_questions": -2, "cooldown_between_questions": -1}"#,
        )
        .unwrap();
        assert_eq!(s.question_duration(), TimeDelta::zero());
        assert_eq!(s.cooldown(), TimeDelta::zero());
    }

    #[test]
    fn huge_durations_capped_at_a_year() {
        let s = Settings::from_json(
            r#"{"duration_of_questions": 1e12,
                "cooldown_between_questions": 1e300,
                "grace_period_duration_in_seconds": 1e17}"#,
        )
        .unwrap();
        let year = TimeDelta::days(365);
        assert_eq!(s.duration_of_questions, 525_600.0);
        assert_eq!(s.question_duration(), year);
        assert_eq!(s.cooldown(), year);
        assert_eq!(s.grace_period(), year);
    }

    #[test]
    fn unsanitized_values_still_convert() {
        let s = Settings {
            duration_of_questions: f64::INFINITY,
            grace_period_duration_in_seconds: f64::NAN,
            ..Settings::default()
        };
        assert_eq!(s.question_duration(), TimeDelta::days(365));
        assert_eq!(s.grace_period(), TimeDelta::zero());
        assert_eq!(
            Settings::default().with_grace_period(1e20).grace_period(),
            TimeDelta::days(365)
        );
    }

    #[test]
    fn fractional_minutes() {
        let s = Settings {
            duration_of_questions: 0.5,
            ..Settings::default()
        };
        assert_eq!(s.question_duration(), TimeDelta::seconds(30));
    }

    #[test]
    fn invalid_json_is_configuration_error() {
        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, BotError::Configuration(_)));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let s = Settings::default().with_seed(9).with_winners(0);
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
    }

    #[test]
    fn load_missing_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn builder_methods() {
        let s = Settings::default()
            .with_seed(1)
            .with_winners(0)
            .with_grace_period(5.0)
            .with_live_only(false)
            .with_auto_run(false);
        assert_eq!(s.seed, Some(1));
        assert_eq!(s.number_of_winners, 0);
        assert!(s.enable_grace_period);
        assert_eq!(s.grace_period(), TimeDelta::seconds(5));
        assert!(!s.run_only_when_live);
        assert!(!s.automatically_run_next_question);
    }

    #[test]
    fn log_level_filters() {
        assert_eq!(LogLevel::All.level_filter(), LevelFilter::TRACE);
        assert_eq!(LogLevel::Fatal.level_filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::Nothing.level_filter(), LevelFilter::OFF);
    }

    #[test]
    fn paths_in_dir() {
        let paths = BotPaths::in_dir(Path::new("/bot"));
        assert_eq!(paths.questions, Some(PathBuf::from("/bot/questions.json")));
        assert_eq!(paths.display, Some(PathBuf::from("/bot/currentquestion.txt")));
        assert_eq!(BotPaths::in_memory().settings, None);
    }
}
