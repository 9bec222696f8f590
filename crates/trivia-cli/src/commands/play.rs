//! Console host: drive a bot from stdin as if it were chat.

use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::info;
use trivia_bot::settings::SETTINGS_FILE;
use trivia_bot::{BotPaths, ChatMessage, Host, RequestError, Settings, TriviaBot};

use crate::logging;

/// Flags of the `play` command.
pub struct PlayOptions {
    pub user: String,
    pub admin: bool,
    pub offline: bool,
    pub game: Option<String>,
    pub seed: Option<u64>,
}

/// A host whose chat is the terminal.
struct ConsoleHost {
    admin_id: Option<String>,
    live: bool,
    game: Option<String>,
    ledger: BTreeMap<String, u64>,
}

impl Host for ConsoleHost {
    fn has_permission(&self, user_id: &str, tier: &str) -> bool {
        tier.eq_ignore_ascii_case("everyone") || self.admin_id.as_deref() == Some(user_id)
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn currency_name(&self) -> String {
        "points".to_string()
    }

    fn add_points(&mut self, _user_id: &str, display_name: &str, amount: u64) -> bool {
        *self.ledger.entry(display_name.to_string()).or_default() += amount;
        true
    }

    fn send_message(&mut self, text: &str) {
        println!("{} {text}", "trivia>".bold());
    }

    fn get_request(&mut self, url: &str) -> Result<String, RequestError> {
        match &self.game {
            Some(game) => Ok(serde_json::json!({ "status": 200, "response": game }).to_string()),
            None => Err(RequestError(format!("no game set for {url} (use --game)"))),
        }
    }
}

pub fn run(dir: &Path, options: PlayOptions) -> Result<(), String> {
    let paths = BotPaths::in_dir(dir);
    let settings_path = dir.join(SETTINGS_FILE);
    let settings = Settings::load(&settings_path).map_err(|e| e.to_string())?;
    settings.save(&settings_path).map_err(|e| e.to_string())?;
    let _guard = logging::init(&settings, dir);

    let settings = match options.seed {
        Some(seed) => settings.with_seed(seed),
        None => settings,
    };

    let mut host = ConsoleHost {
        admin_id: options.admin.then(|| options.user.to_lowercase()),
        live: !options.offline,
        game: options.game,
        ledger: BTreeMap::new(),
    };
    let mut bot = TriviaBot::with_settings(&mut host, settings, paths, Utc::now())
        .map_err(|e| format!("failed to start trivia: {e}"))?;
    info!(user = %options.user, admin = options.admin, "play session started");

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        let now = Utc::now();
        if let Err(e) = bot.tick(&mut host, now) {
            eprintln!("{} {e}", "error:".red());
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let message = parse_line(text, &options.user);
        if let Err(e) = bot.execute(&mut host, &message, now) {
            eprintln!("{} {e}", "error:".red());
        }
    }

    print_ledger(&host.ledger);
    Ok(())
}

/// `name: text` chats as `name`; anything else chats as the session user.
fn parse_line(text: &str, user: &str) -> ChatMessage {
    match text.split_once(": ") {
        Some((name, said))
            if !name.is_empty() && !name.starts_with('!') && !name.contains(' ') =>
        {
            ChatMessage::new(name.to_lowercase(), name, said)
        }
        _ => ChatMessage::new(user.to_lowercase(), user, text),
    }
}

fn print_ledger(ledger: &BTreeMap<String, u64>) {
    println!();
    if ledger.is_empty() {
        println!("  No payouts.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Chatter", "Points"]);
    for (name, points) in ledger {
        table.add_row(vec![name.clone(), points.to_string()]);
    }

    println!("{table}");
    println!();
    println!("  {} chatters paid", ledger.len());
}
