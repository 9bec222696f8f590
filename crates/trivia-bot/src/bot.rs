//! The trivia controller: round lifecycle, payouts and timer handling.

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};
use trivia_core::{GameFilter, QuestionStore};

use crate::detect;
use crate::display::DisplayFile;
use crate::error::{BotError, BotResult};
use crate::format::{self, FormatContext};
use crate::host::Host;
use crate::reward;
use crate::round::{self, RoundState};
use crate::settings::{BotPaths, RewardScaling, Settings};

/// Delay before retrying when there is nothing to ask.
const EMPTY_POOL_RETRY_SECS: i64 = 60;
/// How long announcements stay in the display file.
const ANNOUNCE_HOLD_SECS: i64 = 10;
/// How long the readiness notice stays in the display file.
const READY_HOLD_SECS: i64 = 86_400;
/// Minimum gap between chat readiness notices.
const READY_NOTICE_INTERVAL_MINS: i64 = 10;

/// Notice shown when a manual-mode question can be started.
pub const READY_NOTICE: &str = "The next question is ready! Type !trivia to begin.";

/// A running trivia minigame.
///
/// The host drives it with chat messages ([`TriviaBot::execute`]) and timer
/// ticks ([`TriviaBot::tick`]), passing itself and the current time on every
/// call.
#[derive(Debug)]
pub struct TriviaBot {
    pub(crate) settings: Settings,
    pub(crate) store: QuestionStore,
    pub(crate) round: RoundState,
    pub(crate) display: DisplayFile,
    pub(crate) paths: BotPaths,
    pub(crate) rng: StdRng,
    pub(crate) current_game: String,
    pub(crate) running: bool,
    pub(crate) last_ready_notice: Option<DateTime<Utc>>,
}

impl TriviaBot {
    /// Create a bot from settings and questions already in memory.
    pub fn new(settings: Settings, store: QuestionStore, paths: BotPaths, now: DateTime<Utc>) -> Self {
        let settings = settings.sanitized();
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let display = DisplayFile::new(paths.display.clone());
        Self {
            settings,
            store,
            round: RoundState::new(now),
            display,
            paths,
            rng,
            current_game: String::new(),
            running: true,
            last_ready_notice: None,
        }
    }

    /// Load settings and questions from `paths` and get ready to play.
    ///
    /// The settings file is written back at once so it always lists every
    /// key. With game detection on, the channel's game is looked up first.
    pub fn init(host: &mut dyn Host, paths: BotPaths, now: DateTime<Utc>) -> BotResult<Self> {
        let settings = match &paths.settings {
            Some(path) => {
                let settings = Settings::load(path)?;
                settings.save(path)?;
                settings
            }
            None => Settings::default(),
        };
        Self::with_settings(host, settings, paths, now)
    }

    /// Like [`TriviaBot::init`], with settings supplied by the caller.
    pub fn with_settings(
        host: &mut dyn Host,
        settings: Settings,
        paths: BotPaths,
        now: DateTime<Utc>,
    ) -> BotResult<Self> {
        let store = match &paths.questions {
            Some(path) => QuestionStore::load(path)?,
            None => QuestionStore::new(),
        };

        let mut bot = Self::new(settings, store, paths, now);
        if bot.settings.enable_game_detection {
            bot.refresh_game(host)?;
        }
        info!(questions = bot.store.len(), "trivia minigame loaded");
        Ok(bot)
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The question store.
    pub fn store(&self) -> &QuestionStore {
        &self.store
    }

    /// Round timers and the in-flight question.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// The overlay display file.
    pub fn display(&self) -> &DisplayFile {
        &self.display
    }

    /// The detected game, empty when detection is off.
    pub fn current_game(&self) -> &str {
        &self.current_game
    }

    /// Whether the bot is running (not stopped by an admin).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Write the question store to disk.
    pub fn save_questions(&self) -> BotResult<()> {
        let Some(path) = &self.paths.questions else {
            return Ok(());
        };
        self.store.save(path).map_err(|e| {
            error!(error = %e, "failed to save questions");
            BotError::from(e)
        })
    }

    /// Ask a question: `explicit` picks a pool index, otherwise one is drawn.
    ///
    /// Returns false when the pool is empty; the next attempt is then
    /// scheduled a minute out.
    pub fn start_round(
        &mut self,
        host: &mut dyn Host,
        explicit: Option<usize>,
        now: DateTime<Utc>,
    ) -> BotResult<bool> {
        if self.settings.enable_game_detection {
            self.refresh_game(host)?;
        }

        let pool = self.store.pool_len();
        if pool == 0 {
            warn!(
                retry_in_secs = EMPTY_POOL_RETRY_SECS,
                "no questions available to ask"
            );
            let retry = TimeDelta::seconds(EMPTY_POOL_RETRY_SECS);
            self.round.defer(round::offset(now, retry));
            return Ok(false);
        }

        let index = match explicit {
            Some(i) if i < pool => i,
            Some(i) => {
                warn!(index = i + 1, pool, "question index out of range");
                return Err(BotError::UserInput(format!(
                    "Error loading question. Was the supplied index a number and between 1 and {pool}?"
                )));
            }
            None => self.pick_index(pool),
        };
        let Some(base) = self.store.get(index).map(|q| q.points) else {
            return Ok(false);
        };

        let reward = match self.settings.reward_scaling {
            RewardScaling::Static => base,
            RewardScaling::Random => {
                let m = reward::random_multiplier(
                    &mut self.rng,
                    self.settings.point_value_random_lower_bound,
                    self.settings.point_value_random_upper_bound,
                );
                reward::scale_points(base, m)
            }
        };

        let expiry = round::offset(now, self.settings.question_duration());
        self.round.begin(index, reward, expiry);
        self.display.release();
        info!(index = index + 1, reward, "question started");

        if !self.settings.create_current_question_file {
            let currency = host.currency_name();
            let text = format::render(
                &self.settings.question_ask_string,
                &self.context(&currency, now),
            );
            host.send_message(&text);
        }
        Ok(true)
    }

    /// Check a chat message against the active question.
    ///
    /// Returns true if the sender became a new winner.
    pub fn record_answer(
        &mut self,
        host: &mut dyn Host,
        user_id: &str,
        display_name: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> BotResult<bool> {
        let Some(index) = self.round.current() else {
            return Ok(false);
        };
        let correct = self.store.get(index).is_some_and(|q| q.is_correct(text));
        if !correct || !self.round.admit(user_id, display_name) {
            return Ok(false);
        }
        debug!(user = display_name, "correct answer");

        let cap = self.settings.number_of_winners as usize;
        if cap > 0 && self.round.winners().len() >= cap {
            self.end_round(host, now)?;
        } else if self.settings.enable_grace_period
            && self.round.arm_grace(round::offset(now, self.settings.grace_period()))
        {
            debug!(expiry = %self.round.expiry_time(), "grace period armed");
        }
        Ok(true)
    }

    /// Resolve the active question: pay winners, adjust its value, announce.
    pub fn end_round(&mut self, host: &mut dyn Host, now: DateTime<Utc>) -> BotResult<()> {
        let cooldown = if self.settings.randomize_question_cooldown {
            let m = reward::random_multiplier(
                &mut self.rng,
                self.settings.question_cooldown_random_lower_bound,
                self.settings.question_cooldown_random_upper_bound,
            );
            reward::scale_delta(self.settings.cooldown(), m)
        } else {
            self.settings.cooldown()
        };
        let Some(resolution) = self.round.finish(round::offset(now, cooldown)) else {
            return Ok(());
        };

        let currency = host.currency_name();
        let to_file = self.settings.create_current_question_file;
        let names = round::sorted_names(&resolution.winners);
        let template = match (names.is_empty(), to_file) {
            (false, false) => &self.settings.question_reward_string,
            (false, true) => &self.settings.question_file_reward_string,
            (true, false) => &self.settings.question_expiration_string,
            (true, true) => &self.settings.question_file_expiration_string,
        };
        let ctx = FormatContext {
            index: Some(resolution.index),
            reward: resolution.reward,
            winners: &names,
            question: self.store.get(resolution.index),
            ..self.context(&currency, now)
        };
        let announcement = format::render(template, &ctx);

        if names.is_empty() {
            info!(index = resolution.index + 1, "question expired unanswered");
            let pct = self.settings.percent_loyalty_point_value_increase_on_unanswered;
            if pct > 0.0 {
                if let Some(q) = self.store.get_mut(resolution.index) {
                    q.points = reward::increase(q.points, pct);
                }
                self.save_questions()?;
            }
        } else {
            if self.settings.enable_loyalty_point_rewards {
                let each = reward::share(
                    resolution.reward,
                    resolution.winners.len(),
                    self.settings.enable_points_dividing,
                );
                for w in &resolution.winners {
                    if !host.add_points(&w.user_id, &w.display_name, each) {
                        warn!(user = %w.display_name, amount = each, "host refused payout");
                    }
                }
            }
            info!(
                index = resolution.index + 1,
                winners = resolution.winners.len(),
                "question answered"
            );
            let pct = self.settings.percent_loyalty_point_value_decrease_on_answered;
            if pct > 0.0 {
                if let Some(q) = self.store.get_mut(resolution.index) {
                    q.points = reward::decay(q.points, pct);
                }
                self.save_questions()?;
            }
        }

        if to_file {
            self.display
                .write(&announcement, TimeDelta::seconds(ANNOUNCE_HOLD_SECS), now)
        } else {
            host.send_message(&announcement);
            Ok(())
        }
    }

    /// Advance timers. Called periodically by the host.
    pub fn tick(&mut self, host: &mut dyn Host, now: DateTime<Utc>) -> BotResult<()> {
        if !self.running || !self.is_online(host) {
            return Ok(());
        }

        if self.round.is_active() {
            if now > self.round.expiry_time() {
                debug!("question time exceeded");
                return self.end_round(host, now);
            }
            if self.settings.create_current_question_file && self.display.is_due(now) {
                let currency = host.currency_name();
                let line = format::render(
                    &self.settings.question_file_ask_string,
                    &self.context(&currency, now),
                );
                self.display.write(&line, TimeDelta::seconds(1), now)?;
            }
            return Ok(());
        }

        if now > self.round.next_round_time() {
            if self.settings.automatically_run_next_question {
                self.start_round(host, None, now)?;
            } else {
                self.round.mark_ready();
                self.notify_ready(host, now)?;
            }
        } else if self.settings.create_current_question_file && self.display.is_due(now) {
            let line = format!(
                "Time until next question: {}.",
                format::format_clock(self.round.next_round_time() - now)
            );
            self.display.write(&line, TimeDelta::seconds(1), now)?;
        }
        Ok(())
    }

    /// Replace the settings, as when the host's settings UI is saved.
    ///
    /// Timers of the current phase move by the change in duration or
    /// cooldown, so an in-flight round is not cut short or restarted.
    pub fn reload_settings(
        &mut self,
        host: &mut dyn Host,
        settings: Settings,
        now: DateTime<Utc>,
    ) -> BotResult<()> {
        let settings = settings.sanitized();
        if let Some(path) = &self.paths.settings {
            settings.save(path)?;
        }
        let old = std::mem::replace(&mut self.settings, settings);

        if old.create_current_question_file && !self.settings.create_current_question_file {
            self.display.clear()?;
        }

        if self.round.is_active() {
            let delta = self.settings.question_duration() - old.question_duration();
            if !delta.is_zero() {
                self.round.shift_expiry(delta);
            }
        } else {
            let delta = self.settings.cooldown() - old.cooldown();
            if !delta.is_zero() {
                self.round.shift_next_round(delta);
            }
        }

        if let Some(seed) = self.settings.seed.filter(|_| old.seed != self.settings.seed) {
            self.rng = StdRng::seed_from_u64(seed);
        }

        if old.enable_game_detection != self.settings.enable_game_detection {
            if self.settings.enable_game_detection {
                self.refresh_game(host)?;
            } else {
                self.current_game.clear();
                self.store.set_filter(GameFilter::all());
            }
        }
        info!(now = %now, "settings reloaded");
        Ok(())
    }

    pub(crate) fn is_online(&self, host: &dyn Host) -> bool {
        !self.settings.run_only_when_live || host.is_live()
    }

    /// Format context for the active question.
    pub(crate) fn context<'a>(&'a self, currency: &'a str, now: DateTime<Utc>) -> FormatContext<'a> {
        let index = self.round.current();
        FormatContext {
            index,
            currency,
            question: index.and_then(|i| self.store.get(i)),
            reward: self.round.reward(),
            winners: &[],
            winners_possible: self.settings.number_of_winners,
            rewards_enabled: self.settings.enable_loyalty_point_rewards,
            dividing: self.settings.enable_points_dividing,
            time_remaining: self
                .round
                .is_active()
                .then(|| self.round.expiry_time() - now),
            time_until_next: Some(self.round.next_round_time() - now),
        }
    }

    fn refresh_game(&mut self, host: &mut dyn Host) -> BotResult<()> {
        let game = detect::detect_game(host, &self.settings.twitch_channel_name)?;
        if self.store.filter().current_game() != Some(game.as_str()) {
            info!(game = %game, "current game changed");
            self.store.set_filter(GameFilter::game(game.clone()));
        }
        self.current_game = game;
        Ok(())
    }

    /// Draw a pool index, never the one just asked when there is a choice.
    fn pick_index(&mut self, pool: usize) -> usize {
        let avoid = self
            .round
            .current()
            .or(self.round.previous())
            .filter(|&i| i < pool);
        match avoid {
            Some(avoid) if pool > 1 => {
                let i = self.rng.random_range(0..pool - 1);
                if i >= avoid { i + 1 } else { i }
            }
            _ => self.rng.random_range(0..pool),
        }
    }

    fn notify_ready(&mut self, host: &mut dyn Host, now: DateTime<Utc>) -> BotResult<()> {
        if self.settings.create_current_question_file {
            if self.display.is_due(now) {
                self.display.write(READY_NOTICE, TimeDelta::seconds(READY_HOLD_SECS), now)?;
            }
            return Ok(());
        }
        let due = self
            .last_ready_notice
            .is_none_or(|t| now - t >= TimeDelta::minutes(READY_NOTICE_INTERVAL_MINS));
        if due && self.store.pool_len() > 0 {
            host.send_message(READY_NOTICE);
            self.last_ready_notice = Some(now);
        }
        Ok(())
    }
}
