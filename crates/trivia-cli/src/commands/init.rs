use std::fs;
use std::path::Path;

use trivia_bot::settings::{QUESTIONS_FILE, SETTINGS_FILE};
use trivia_bot::Settings;
use trivia_core::{Question, QuestionStore};

pub fn run(name: &str) -> Result<(), String> {
    let dir = Path::new(name);

    if dir.exists() {
        return Err(format!("directory '{name}' already exists"));
    }

    fs::create_dir_all(dir).map_err(|e| format!("cannot create directory: {e}"))?;

    Settings::default()
        .save(&dir.join(SETTINGS_FILE))
        .map_err(|e| e.to_string())?;

    sample_questions()
        .save(&dir.join(QUESTIONS_FILE))
        .map_err(|e| e.to_string())?;

    println!("Created trivia bot '{name}' in {name}/");
    println!("  {SETTINGS_FILE}   game settings");
    println!("  {QUESTIONS_FILE}  sample questions");
    println!();
    println!("Get started:");
    println!("  cd {name}");
    println!("  trivia list            # List all questions");
    println!("  trivia play --admin    # Play in the terminal");

    Ok(())
}

fn sample_questions() -> QuestionStore {
    QuestionStore::from_questions(vec![
        Question::new(10, "Portal", "The cake is a...?", ["lie", "a lie"]),
        Question::new(
            15,
            "Half-Life",
            "What did Gordon Freeman study?",
            ["physics", "theoretical physics"],
        ),
        Question::new(
            20,
            "The Legend of Zelda",
            "What is the name of the hero?",
            ["link"],
        ),
    ])
}
