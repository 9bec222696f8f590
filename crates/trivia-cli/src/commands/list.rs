use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use trivia_bot::settings::QUESTIONS_FILE;
use trivia_core::{GameFilter, QuestionStore};

pub fn run(dir: &Path, game: Option<&str>) -> Result<(), String> {
    let mut store = QuestionStore::load(&dir.join(QUESTIONS_FILE)).map_err(|e| e.to_string())?;
    if let Some(game) = game {
        store.set_filter(GameFilter::game(game));
    }

    if store.pool_len() == 0 {
        println!("  No questions found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Game", "Points", "Question", "Answers"]);

    for (i, q) in store.pool().enumerate() {
        let question = if q.question.chars().count() > 60 {
            let short: String = q.question.chars().take(57).collect();
            format!("{short}...")
        } else {
            q.question.clone()
        };
        table.add_row(vec![
            (i + 1).to_string(),
            q.game.clone(),
            q.points.to_string(),
            question,
            q.answers().join(" | "),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} questions", store.pool_len());

    Ok(())
}
