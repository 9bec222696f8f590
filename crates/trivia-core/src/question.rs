use serde::{Deserialize, Deserializer, Serialize};

/// A single trivia question.
///
/// Answers are stored trimmed and lowercased, without duplicates, in the
/// order they were first added. Matching against chat input is
/// case-insensitive and ignores surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Base reward value in the host's currency.
    #[serde(rename = "Points")]
    pub points: u64,
    /// The game this question is about.
    #[serde(rename = "Game")]
    pub game: String,
    /// The question text shown in chat.
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Answers", deserialize_with = "deserialize_answers")]
    answers: Vec<String>,
}

impl Question {
    /// Create a question. Answers are normalized; empty ones are dropped.
    pub fn new(
        points: u64,
        game: impl Into<String>,
        question: impl Into<String>,
        answers: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let mut q = Self {
            points,
            game: game.into(),
            question: question.into(),
            answers: Vec::new(),
        };
        q.set_answers(answers);
        q
    }

    /// The accepted answers.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Replace all answers.
    pub fn set_answers(&mut self, answers: impl IntoIterator<Item = impl AsRef<str>>) {
        self.answers.clear();
        for a in answers {
            self.add_answer(a.as_ref());
        }
    }

    /// Add an answer. Returns false if it was empty or already accepted.
    pub fn add_answer(&mut self, answer: &str) -> bool {
        let normalized = normalize(answer);
        if normalized.is_empty() || self.answers.contains(&normalized) {
            return false;
        }
        self.answers.push(normalized);
        true
    }

    /// Remove an answer. Returns true if it was present.
    pub fn remove_answer(&mut self, answer: &str) -> bool {
        let normalized = normalize(answer);
        let len_before = self.answers.len();
        self.answers.retain(|a| *a != normalized);
        self.answers.len() < len_before
    }

    /// Whether a chat message is one of the accepted answers.
    pub fn is_correct(&self, message: &str) -> bool {
        let normalized = normalize(message);
        self.answers.contains(&normalized)
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game: {}, Question: {}", self.game, self.question)
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

fn deserialize_answers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    let mut answers: Vec<String> = Vec::with_capacity(raw.len());
    for a in raw {
        let normalized = normalize(&a);
        if !normalized.is_empty() && !answers.contains(&normalized) {
            answers.push(normalized);
        }
    }
    Ok(answers)
}
