//! CLI frontend for the trivia minigame.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trivia",
    about = "Trivia minigame for livestream chat bots",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new bot directory with default settings and sample questions
    Init {
        /// Name of the directory to create
        name: String,
    },

    /// List stored questions
    List {
        /// Bot directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Only show questions about this game
        #[arg(short, long)]
        game: Option<String>,
    },

    /// Play in the terminal: each input line is a chat message
    Play {
        /// Bot directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Name to chat as
        #[arg(short, long, default_value = "streamer")]
        user: String,

        /// Give the chatting user admin permissions
        #[arg(long)]
        admin: bool,

        /// Pretend the stream is offline
        #[arg(long)]
        offline: bool,

        /// Game reported to game detection
        #[arg(short, long)]
        game: Option<String>,

        /// RNG seed for reproducible sessions
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { name } => commands::init::run(&name),
        Commands::List { dir, game } => commands::list::run(&dir, game.as_deref()),
        Commands::Play {
            dir,
            user,
            admin,
            offline,
            game,
            seed,
        } => commands::play::run(
            &dir,
            commands::play::PlayOptions {
                user,
                admin,
                offline,
                game,
                seed,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
