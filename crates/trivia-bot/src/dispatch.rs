//! Chat command parsing and dispatch.
//!
//! Every chat message goes through [`TriviaBot::execute`]. `!trivia` alone is
//! the player command; `!trivia <subcommand>` is reserved for admins; any
//! other message is an answer attempt while a question is active.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use trivia_core::Question;

use crate::bot::TriviaBot;
use crate::error::{BotError, BotResult};
use crate::format;
use crate::host::{ChatMessage, Host};

/// Syntax help for `!trivia add`.
pub const ADD_SYNTAX: &str = "Syntax: !trivia add (game:<Game Name>,) (points:<Points>,) \
     question:<Question>, answers:<Pipe-Separated List of Answers>";
/// Syntax help for `!trivia remove`.
pub const REMOVE_SYNTAX: &str = "Syntax: !trivia remove <Question Index>";
/// Syntax help for `!trivia modify`.
pub const MODIFY_SYNTAX: &str = "Syntax: !trivia modify <Question Index> (game:<New Value>,) \
     (question:<New Value>,) (points:<New Value>,) \
     (answers <add/remove/set>: <New Value>|<New Value>| ...)";
/// General usage, shown for unknown subcommands.
pub const USAGE: &str = "Usage: !trivia [start|stop|count|answers|save|load <index>|\
     add <attributes>|remove <index>|modify <index> <attributes>]";

/// A parsed chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Not a trivia command; a possible answer.
    Chat,
    /// Bare `!trivia`.
    Ask,
    /// `!trivia start`
    Start,
    /// `!trivia stop`
    Stop,
    /// `!trivia count`
    Count,
    /// `!trivia answers`
    Answers,
    /// `!trivia save`
    Save,
    /// `!trivia load [index]`
    Load(Option<&'a str>),
    /// `!trivia add <attributes>`
    Add(Option<&'a str>),
    /// `!trivia remove <index>`
    Remove(Option<&'a str>),
    /// `!trivia modify <index> <attributes>`
    Modify(Option<&'a str>),
    /// Any other subcommand.
    Unknown(&'a str),
}

/// Parse a chat message into a command.
///
/// The command word and subcommand match in any ASCII case.
pub fn parse_command(text: &str) -> Command<'_> {
    let (head, rest) = split_word(text);
    if !head.eq_ignore_ascii_case("!trivia") {
        return Command::Chat;
    }
    let (sub, args) = split_word(rest);
    let args = Some(args.trim()).filter(|a| !a.is_empty());
    match sub.to_ascii_lowercase().as_str() {
        "" => Command::Ask,
        "start" => Command::Start,
        "stop" => Command::Stop,
        "count" => Command::Count,
        "answers" => Command::Answers,
        "save" => Command::Save,
        "load" => Command::Load(args),
        "add" => Command::Add(args),
        "remove" => Command::Remove(args),
        "modify" => Command::Modify(args),
        _ => Command::Unknown(sub),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn pipe_list(value: &str) -> impl Iterator<Item = &str> {
    value.split('|').map(str::trim).filter(|a| !a.is_empty())
}

impl TriviaBot {
    /// Handle one chat message.
    ///
    /// Mistakes in a command are answered in chat and do not surface as
    /// errors; only configuration and persistence failures are returned.
    pub fn execute(
        &mut self,
        host: &mut dyn Host,
        message: &ChatMessage,
        now: DateTime<Utc>,
    ) -> BotResult<()> {
        let command = parse_command(&message.text);

        if !self.running {
            if command == Command::Start && self.is_admin(host, message) {
                self.running = true;
                info!("trivia started by command");
                host.send_message("Trivia started.");
            }
            return Ok(());
        }
        if !self.is_online(host) {
            return Ok(());
        }

        let result = match command {
            Command::Chat => {
                if self.is_player(host, message) {
                    self.record_answer(
                        host,
                        &message.user_id,
                        &message.display_name,
                        &message.text,
                        now,
                    )
                    .map(|_| ())
                } else {
                    Ok(())
                }
            }
            Command::Ask => {
                if self.is_player(host, message) {
                    self.ask(host, now)
                } else {
                    Ok(())
                }
            }
            admin => {
                if self.is_admin(host, message) {
                    self.run_admin(host, admin, now)
                } else {
                    info!(
                        user = %message.display_name,
                        text = %message.text,
                        "admin command without permission"
                    );
                    host.send_message(&format!(
                        "{}, you do not have the permissions to use this command.",
                        message.display_name
                    ));
                    Ok(())
                }
            }
        };

        match result {
            Err(BotError::UserInput(text)) => {
                host.send_message(&text);
                Ok(())
            }
            other => other,
        }
    }

    fn is_admin(&self, host: &dyn Host, message: &ChatMessage) -> bool {
        host.has_permission(&message.user_id, &self.settings.permissions_admins)
    }

    fn is_player(&self, host: &dyn Host, message: &ChatMessage) -> bool {
        host.has_permission(&message.user_id, &self.settings.permissions_players)
    }

    fn ask(&mut self, host: &mut dyn Host, now: DateTime<Utc>) -> BotResult<()> {
        if self.store.pool_len() == 0 {
            warn!("asked for trivia but no questions exist");
            host.send_message("Could not load trivia. No questions exist.");
            return Ok(());
        }

        if self.round.is_active() {
            let currency = host.currency_name();
            let ask = format::render(
                &self.settings.question_ask_string,
                &self.context(&currency, now),
            );
            let remaining = format::format_clock(self.round.expiry_time() - now);
            host.send_message(&format!("{ask} Time remaining: {remaining}"));
            return Ok(());
        }

        if !self.settings.automatically_run_next_question && self.round.ready_for_next() {
            debug!("starting question on request");
            self.last_ready_notice = Some(now);
            self.start_round(host, None, now)?;
        } else if self.settings.display_next_question_time {
            let wait = format::format_clock(self.round.next_round_time() - now);
            host.send_message(&format!(
                "There is no active trivia question. The next trivia question arrives in {wait}."
            ));
        } else {
            host.send_message("There is no active trivia question.");
        }
        Ok(())
    }

    fn run_admin(
        &mut self,
        host: &mut dyn Host,
        command: Command<'_>,
        now: DateTime<Utc>,
    ) -> BotResult<()> {
        match command {
            Command::Start => host.send_message("Trivia is already running."),
            Command::Stop => {
                self.running = false;
                self.round.abandon();
                self.display.clear()?;
                info!("trivia stopped by command");
                host.send_message("Trivia stopped.");
            }
            Command::Count => {
                let text = if self.settings.enable_game_detection {
                    format!(
                        "Total questions: {}. Questions from {}: {}.",
                        self.store.len(),
                        self.current_game,
                        self.store.pool_len()
                    )
                } else {
                    format!("Number of questions available: {}.", self.store.len())
                };
                host.send_message(&text);
            }
            Command::Answers => {
                let text = match self.round.current().and_then(|i| self.store.get(i)) {
                    Some(q) => format!(
                        "Answers to the current question: {}",
                        q.answers().join(", ")
                    ),
                    None => "No questions are currently loaded.".to_string(),
                };
                host.send_message(&text);
            }
            Command::Save => {
                self.save_questions()?;
                host.send_message("Trivia saved.");
            }
            Command::Load(index) => self.load(host, index, now)?,
            Command::Add(None) => host.send_message(ADD_SYNTAX),
            Command::Add(Some(attrs)) => self.add(host, attrs)?,
            Command::Remove(None) => host.send_message(REMOVE_SYNTAX),
            Command::Remove(Some(index)) => self.remove(host, index)?,
            Command::Modify(None) => host.send_message(MODIFY_SYNTAX),
            Command::Modify(Some(args)) => self.modify(host, args)?,
            Command::Unknown(_) | Command::Chat | Command::Ask => host.send_message(USAGE),
        }
        Ok(())
    }

    fn load(
        &mut self,
        host: &mut dyn Host,
        index: Option<&str>,
        now: DateTime<Utc>,
    ) -> BotResult<()> {
        let pool = self.store.pool_len();
        if pool == 0 {
            info!("load requested but no questions exist");
            host.send_message("Cannot load questions - no questions exist.");
            return Ok(());
        }
        let explicit = match index {
            None => None,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => Some(n - 1),
                _ => {
                    warn!(index = raw, "question index is not a number");
                    return Err(BotError::UserInput(format!(
                        "Error loading question. Was the supplied index a number and between 1 and {pool}?"
                    )));
                }
            },
        };
        self.start_round(host, explicit, now)?;
        Ok(())
    }

    fn add(&mut self, host: &mut dyn Host, attrs: &str) -> BotResult<()> {
        let parser = self.settings.attribute_parser();

        let points = match parser.find(attrs, "points") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                debug!(points = raw, "point value is not a number, using the default");
                self.settings.default_loyalty_point_value
            }),
            Err(_) => self.settings.default_loyalty_point_value,
        };

        let game = match parser.find(attrs, "game") {
            Ok(game) if !game.is_empty() => game.to_string(),
            _ if !self.current_game.is_empty() => self.current_game.clone(),
            _ => {
                warn!("question not added, no game given");
                return Err(BotError::UserInput(
                    "Error: No game attribute detected. Please supply a game name.".to_string(),
                ));
            }
        };

        let text = match parser.find(attrs, "question") {
            Ok(text) if !text.is_empty() => text,
            _ => {
                warn!("question not added, no question given");
                return Err(BotError::UserInput(
                    "Error: No question attribute detected.".to_string(),
                ));
            }
        };

        let question = Question::new(
            points,
            game,
            text,
            parser.find(attrs, "answers").map(pipe_list).into_iter().flatten(),
        );
        if question.answers().is_empty() {
            warn!("question not added, no answers given");
            return Err(BotError::UserInput(
                "Error: No answers attribute detected. A question cannot be added without valid answers."
                    .to_string(),
            ));
        }

        info!(question = %question, "question added");
        self.store.push(question);
        self.save_questions()?;
        host.send_message("Question added.");
        Ok(())
    }

    fn remove(&mut self, host: &mut dyn Host, raw: &str) -> BotResult<()> {
        let pool = self.store.pool_len();
        let index = match raw.parse::<usize>() {
            Ok(n) if (1..=pool).contains(&n) => n - 1,
            _ => {
                warn!(index = raw, pool, "question could not be removed");
                return Err(BotError::UserInput(format!(
                    "Error removing question. Was the supplied index a number and between 1 and {pool}?"
                )));
            }
        };

        let removed = self.store.remove(index)?;
        if self.round.question_removed(index) {
            self.display.release();
        }
        self.save_questions()?;
        info!(question = %removed, "question removed");
        host.send_message("Question removed.");
        Ok(())
    }

    fn modify(&mut self, host: &mut dyn Host, args: &str) -> BotResult<()> {
        let (raw, attrs) = args
            .split_once(char::is_whitespace)
            .unwrap_or((args, ""));
        let Ok(n) = raw.parse::<usize>() else {
            warn!(index = raw, "modify index is not a number");
            return Err(BotError::UserInput(
                "Error: The supplied index was not a number.".to_string(),
            ));
        };
        let pool = self.store.pool_len();
        if !(1..=pool).contains(&n) {
            return Err(BotError::UserInput(format!(
                "Error: The supplied index was not between 1 and {pool}."
            )));
        }

        let parser = self.settings.attribute_parser();
        let Some(question) = self.store.get_mut(n - 1) else {
            return Ok(());
        };
        let mut changed = false;

        let game = parser.find(attrs, "game").ok();
        if let Some(game) = game.filter(|g| !g.is_empty() && *g != question.game) {
            question.game = game.to_string();
            changed = true;
        }
        let text = parser.find(attrs, "question").ok();
        if let Some(text) = text.filter(|t| !t.is_empty() && *t != question.question) {
            question.question = text.to_string();
            changed = true;
        }
        if let Ok(raw_points) = parser.find(attrs, "points") {
            match raw_points.parse::<u64>() {
                Ok(points) => {
                    changed |= points != question.points;
                    question.points = points;
                }
                Err(_) => {
                    warn!(points = raw_points, "modify point value is not a number");
                    host.send_message(
                        "Error: The supplied point value was not a number. \
                         The question's point value was not changed.",
                    );
                }
            }
        }
        if let Ok(set) = parser.find(attrs, "answers set") {
            let before = question.answers().to_vec();
            let answers: Vec<&str> = pipe_list(set).collect();
            if !answers.is_empty() {
                question.set_answers(answers);
                changed |= question.answers() != before.as_slice();
            }
        } else {
            if let Ok(add) = parser.find(attrs, "answers add") {
                for answer in pipe_list(add) {
                    changed |= question.add_answer(answer);
                }
            }
            if let Ok(remove) = parser.find(attrs, "answers remove") {
                for answer in pipe_list(remove) {
                    changed |= question.remove_answer(answer);
                }
            }
        }

        if changed {
            debug!(index = n, question = %question, "question modified");
            self.save_questions()?;
            host.send_message("Question modified.");
        } else {
            host.send_message("No changes were made to the question.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::MockHost;
    use crate::settings::{BotPaths, Settings};
    use chrono::{TimeDelta, TimeZone};
    use trivia_core::QuestionStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn t(secs: i64) -> DateTime<Utc> {
        t0() + TimeDelta::seconds(secs)
    }

    fn bot_with(settings: Settings) -> TriviaBot {
        let store = QuestionStore::from_questions(vec![
            Question::new(10, "Doom", "Best gun?", ["bfg"]),
            Question::new(20, "Zelda", "Hero?", ["link"]),
            Question::new(30, "Doom", "Demon planet?", ["mars"]),
        ]);
        TriviaBot::new(settings.with_seed(5), store, BotPaths::in_memory(), t0())
    }

    fn bot() -> TriviaBot {
        bot_with(Settings::default())
    }

    fn host() -> MockHost {
        MockHost::new().with_admin("mod")
    }

    fn admin(text: &str) -> ChatMessage {
        ChatMessage::new("mod", "Mod", text)
    }

    fn player(text: &str) -> ChatMessage {
        ChatMessage::new("viewer", "Viewer", text)
    }

    fn say(b: &mut TriviaBot, h: &mut MockHost, msg: ChatMessage) -> String {
        b.execute(h, &msg, t(0)).unwrap();
        h.last().unwrap_or_default().to_string()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("hello"), Command::Chat);
        assert_eq!(parse_command("!trivia"), Command::Ask);
        assert_eq!(parse_command("  !TRIVIA  "), Command::Ask);
        assert_eq!(parse_command("!trivia Start"), Command::Start);
        assert_eq!(parse_command("!Trivia COUNT"), Command::Count);
        assert_eq!(parse_command("!trivia load"), Command::Load(None));
        assert_eq!(parse_command("!trivia load 3"), Command::Load(Some("3")));
        assert_eq!(
            parse_command("!trivia modify 2 game:Doom"),
            Command::Modify(Some("2 game:Doom"))
        );
        assert_eq!(parse_command("!trivia dance"), Command::Unknown("dance"));
        assert_eq!(parse_command("!triviaa"), Command::Chat);
    }

    #[test]
    fn non_admin_is_refused() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(
            say(&mut b, &mut h, player("!trivia count")),
            "Viewer, you do not have the permissions to use this command."
        );
    }

    #[test]
    fn stop_and_start() {
        let (mut b, mut h) = (bot(), host());
        b.start_round(&mut h, Some(0), t(0)).unwrap();
        assert_eq!(say(&mut b, &mut h, admin("!trivia start")), "Trivia is already running.");
        assert_eq!(say(&mut b, &mut h, admin("!trivia stop")), "Trivia stopped.");
        assert!(!b.is_running());
        assert!(!b.round().is_active());
        assert!(h.payouts.is_empty());

        let sent = h.sent.len();
        b.execute(&mut h, &player("!trivia start"), t(1)).unwrap();
        b.execute(&mut h, &admin("!trivia count"), t(1)).unwrap();
        assert_eq!(h.sent.len(), sent);

        assert_eq!(say(&mut b, &mut h, admin("!trivia start")), "Trivia started.");
        assert!(b.is_running());
    }

    #[test]
    fn count_and_answers() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia count")),
            "Number of questions available: 3."
        );
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia answers")),
            "No questions are currently loaded."
        );
        b.start_round(&mut h, Some(1), t(0)).unwrap();
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia answers")),
            "Answers to the current question: link"
        );
    }

    #[test]
    fn count_with_game_detection() {
        let mut h = host().with_game("Doom");
        let mut b = bot_with(Settings {
            enable_game_detection: true,
            twitch_channel_name: "chan".to_string(),
            ..Settings::default()
        });
        b.start_round(&mut h, None, t(0)).unwrap();
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia count")),
            "Total questions: 3. Questions from Doom: 2."
        );
    }

    #[test]
    fn load_by_index() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia load 3")),
            "Win 30 coins by answering: 3) In Doom, Demon planet?"
        );
        assert_eq!(b.round().current(), Some(2));
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia load 9")),
            "Error loading question. Was the supplied index a number and between 1 and 3?"
        );
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia load x")),
            "Error loading question. Was the supplied index a number and between 1 and 3?"
        );
        assert_eq!(b.round().current(), Some(2));
    }

    #[test]
    fn load_with_no_questions() {
        let mut b = TriviaBot::new(
            Settings::default().with_seed(1),
            QuestionStore::new(),
            BotPaths::in_memory(),
            t0(),
        );
        let mut h = host();
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia load")),
            "Cannot load questions - no questions exist."
        );
        assert_eq!(
            say(&mut b, &mut h, player("!trivia")),
            "Could not load trivia. No questions exist."
        );
    }

    #[test]
    fn add_question() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(say(&mut b, &mut h, admin("!trivia add")), ADD_SYNTAX);
        assert_eq!(
            say(
                &mut b,
                &mut h,
                admin("!trivia add game:Portal, points:25, question:The cake is a...?, answers:lie|a lie")
            ),
            "Question added."
        );
        let q = &b.store().questions()[3];
        assert_eq!(q.game, "Portal");
        assert_eq!(q.points, 25);
        assert_eq!(q.question, "The cake is a...?");
        assert_eq!(q.answers(), &["lie".to_string(), "a lie".to_string()]);
    }

    #[test]
    fn add_defaults_points() {
        let (mut b, mut h) = (bot(), host());
        say(
            &mut b,
            &mut h,
            admin("!trivia add game:Portal, points:lots, question:Q?, answers:a"),
        );
        assert_eq!(b.store().questions()[3].points, 10);
        say(&mut b, &mut h, admin("!trivia add game:Portal, question:Q2?, answers:b"));
        assert_eq!(b.store().questions()[4].points, 10);
    }

    #[test]
    fn add_errors() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia add question:Q?, answers:a")),
            "Error: No game attribute detected. Please supply a game name."
        );
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia add game:G, answers:a")),
            "Error: No question attribute detected."
        );
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia add game:G, question:Q?")),
            "Error: No answers attribute detected. A question cannot be added without valid answers."
        );
        assert_eq!(b.store().len(), 3);
    }

    #[test]
    fn add_uses_detected_game_and_filter() {
        let mut h = host().with_game("Doom");
        let mut b = bot_with(Settings {
            enable_game_detection: true,
            twitch_channel_name: "chan".to_string(),
            ..Settings::default()
        });
        b.start_round(&mut h, None, t(0)).unwrap();
        say(&mut b, &mut h, admin("!trivia add question:Q?, answers:a"));
        assert_eq!(b.store().questions()[3].game, "Doom");
        assert_eq!(b.store().pool_len(), 3);

        say(&mut b, &mut h, admin("!trivia add game:Zelda, question:Q?, answers:a"));
        assert_eq!(b.store().len(), 5);
        assert_eq!(b.store().pool_len(), 3);
    }

    #[test]
    fn remove_question() {
        let (mut b, mut h) = (bot(), host());
        b.start_round(&mut h, Some(2), t(0)).unwrap();
        assert_eq!(say(&mut b, &mut h, admin("!trivia remove")), REMOVE_SYNTAX);
        assert_eq!(say(&mut b, &mut h, admin("!trivia remove 1")), "Question removed.");
        assert_eq!(b.store().len(), 2);
        assert_eq!(b.round().current(), Some(1));
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia remove 3")),
            "Error removing question. Was the supplied index a number and between 1 and 2?"
        );
        say(&mut b, &mut h, admin("!trivia remove 2"));
        assert!(!b.round().is_active());
    }

    #[test]
    fn remove_rejects_non_numeric_index() {
        let (mut b, mut h) = (bot(), host());
        for raw in ["abc", "0", "-1", "1.5"] {
            assert_eq!(
                say(&mut b, &mut h, admin(&format!("!trivia remove {raw}"))),
                "Error removing question. Was the supplied index a number and between 1 and 3?"
            );
        }
        assert_eq!(b.store().len(), 3);
    }

    #[test]
    fn save_rewrites_question_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BotPaths::in_dir(dir.path());
        let store = QuestionStore::from_questions(vec![
            Question::new(10, "Doom", "Best gun?", ["bfg"]),
            Question::new(20, "Zelda", "Hero?", ["link"]),
        ]);
        let mut b = TriviaBot::new(Settings::default().with_seed(5), store, paths.clone(), t0());
        let mut h = host();
        let questions = paths.questions.unwrap();
        assert!(!questions.exists());

        assert_eq!(say(&mut b, &mut h, admin("!trivia save")), "Trivia saved.");
        let saved = QuestionStore::load(&questions).unwrap();
        assert_eq!(saved.questions(), b.store().questions());

        std::fs::write(&questions, "[]").unwrap();
        assert_eq!(say(&mut b, &mut h, admin("!trivia save")), "Trivia saved.");
        assert_eq!(QuestionStore::load(&questions).unwrap().len(), 2);

        assert_eq!(
            say(&mut b, &mut h, player("!trivia save")),
            "Viewer, you do not have the permissions to use this command."
        );
    }

    #[test]
    fn modify_question() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(say(&mut b, &mut h, admin("!trivia modify")), MODIFY_SYNTAX);
        assert_eq!(
            say(
                &mut b,
                &mut h,
                admin("!trivia modify 1 question:Best weapon?, points:15, answers add:BFG 9000|plasma")
            ),
            "Question modified."
        );
        let q = b.store().get(0).unwrap();
        assert_eq!(q.question, "Best weapon?");
        assert_eq!(q.points, 15);
        assert_eq!(
            q.answers(),
            &["bfg".to_string(), "bfg 9000".to_string(), "plasma".to_string()]
        );

        say(&mut b, &mut h, admin("!trivia modify 1 answers remove:bfg|nope"));
        assert_eq!(b.store().get(0).unwrap().answers().len(), 2);

        say(&mut b, &mut h, admin("!trivia modify 1 answers set:chainsaw, game:Doom II"));
        let q = b.store().get(0).unwrap();
        assert_eq!(q.answers(), &["chainsaw".to_string()]);
        assert_eq!(q.game, "Doom II");
    }

    #[test]
    fn modify_errors() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia modify one game:X")),
            "Error: The supplied index was not a number."
        );
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia modify 4 game:X")),
            "Error: The supplied index was not between 1 and 3."
        );
        assert_eq!(
            say(&mut b, &mut h, admin("!trivia modify 1 game:Doom")),
            "No changes were made to the question."
        );
    }

    #[test]
    fn modify_bad_points_still_applies_other_changes() {
        let (mut b, mut h) = (bot(), host());
        b.execute(&mut h, &admin("!trivia modify 2 points:many, game:Zelda II"), t(0))
            .unwrap();
        let tail: Vec<&str> = h.sent.iter().rev().take(2).rev().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "Error: The supplied point value was not a number. The question's point value was not changed.",
                "Question modified.",
            ]
        );
        let q = b.store().get(1).unwrap();
        assert_eq!(q.points, 20);
        assert_eq!(q.game, "Zelda II");
    }

    #[test]
    fn unknown_subcommand_shows_usage() {
        let (mut b, mut h) = (bot(), host());
        assert_eq!(say(&mut b, &mut h, admin("!trivia dance")), USAGE);
    }

    #[test]
    fn player_ask_flows() {
        let (mut b, mut h) = (bot(), host());
        b.start_round(&mut h, Some(0), t(0)).unwrap();
        b.execute(&mut h, &player("!trivia"), t(60)).unwrap();
        assert_eq!(
            h.last(),
            Some("Win 10 coins by answering: 1) In Doom, Best gun? Time remaining: 04:00")
        );

        b.execute(&mut h, &player("BFG"), t(61)).unwrap();
        assert_eq!(h.payouts, vec![("viewer".to_string(), 10)]);

        b.execute(&mut h, &player("!trivia"), t(62)).unwrap();
        assert_eq!(h.last(), Some("There is no active trivia question."));
    }

    #[test]
    fn player_ask_shows_wait_time() {
        let mut b = bot_with(Settings {
            display_next_question_time: true,
            ..Settings::default()
        });
        let mut h = host();
        b.start_round(&mut h, Some(0), t(0)).unwrap();
        b.end_round(&mut h, t(0)).unwrap();
        b.execute(&mut h, &player("!trivia"), t(30)).unwrap();
        assert_eq!(
            h.last(),
            Some("There is no active trivia question. The next trivia question arrives in 04:30.")
        );
    }

    #[test]
    fn manual_mode_player_starts_round() {
        let mut b = bot_with(Settings::default().with_auto_run(false));
        let mut h = host();
        b.execute(&mut h, &player("!trivia"), t(0)).unwrap();
        assert!(b.round().is_active());
        b.end_round(&mut h, t(1)).unwrap();

        b.execute(&mut h, &player("!trivia"), t(2)).unwrap();
        assert!(!b.round().is_active());
        assert_eq!(h.last(), Some("There is no active trivia question."));
    }

    #[test]
    fn offline_ignores_commands() {
        let (mut b, mut h) = (bot(), host());
        h.live = false;
        b.execute(&mut h, &admin("!trivia count"), t(0)).unwrap();
        assert!(h.sent.is_empty());
    }
}
