use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::filter::GameFilter;
use crate::question::Question;

/// Every known question plus the filtered pool rounds draw from.
///
/// The pool is a list of indexes into the full question list, rebuilt
/// whenever the filter changes. Pool indexes are what chat commands and the
/// round state refer to; the store maps them back to the owning question.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    questions: Vec<Question>,
    pool: Vec<usize>,
    filter: GameFilter,
}

impl QuestionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unfiltered store from a list of questions.
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let mut store = Self {
            questions,
            pool: Vec::new(),
            filter: GameFilter::all(),
        };
        store.rebuild_pool();
        store
    }

    /// Load questions from a JSON document.
    ///
    /// A missing or unparseable file yields an empty store and a warning;
    /// only genuine read failures are errors.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "no questions file exists");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let body = text.trim_start_matches('\u{feff}');
        let questions: Vec<Question> = match serde_json::from_str(body) {
            Ok(questions) => questions,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "questions file exists but contained no usable data"
                );
                Vec::new()
            }
        };

        info!(count = questions.len(), "questions loaded");
        Ok(Self::from_questions(questions))
    }

    /// Overwrite `path` with the full question list.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.questions
            .serialize(&mut ser)
            .map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        fs::write(path, buf).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "questions file updated");
        Ok(())
    }

    /// The active filter.
    pub fn filter(&self) -> &GameFilter {
        &self.filter
    }

    /// Replace the filter and rebuild the pool.
    pub fn set_filter(&mut self, filter: GameFilter) {
        self.filter = filter;
        self.rebuild_pool();
        info!(
            total = self.questions.len(),
            pool = self.pool.len(),
            game = self.filter.current_game().unwrap_or(""),
            "question pool rebuilt"
        );
    }

    /// All questions, regardless of filter.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the store holds no questions at all.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of questions in the filtered pool.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Questions in the filtered pool, in pool order.
    pub fn pool(&self) -> impl Iterator<Item = &Question> {
        self.pool.iter().map(|&i| &self.questions[i])
    }

    /// Look up a question by pool index.
    pub fn get(&self, pool_index: usize) -> Option<&Question> {
        self.pool.get(pool_index).map(|&i| &self.questions[i])
    }

    /// Look up a question by pool index, mutably.
    pub fn get_mut(&mut self, pool_index: usize) -> Option<&mut Question> {
        let i = *self.pool.get(pool_index)?;
        self.questions.get_mut(i)
    }

    /// Add a question. Returns its pool index if it passed the filter.
    pub fn push(&mut self, question: Question) -> Option<usize> {
        let accepted = self.filter.accepts(&question);
        self.questions.push(question);
        if accepted {
            self.pool.push(self.questions.len() - 1);
            Some(self.pool.len() - 1)
        } else {
            None
        }
    }

    /// Remove the question at a pool index.
    pub fn remove(&mut self, pool_index: usize) -> StoreResult<Question> {
        if pool_index >= self.pool.len() {
            return Err(StoreError::IndexOutOfRange {
                index: pool_index,
                len: self.pool.len(),
            });
        }
        let i = self.pool.remove(pool_index);
        let removed = self.questions.remove(i);
        for entry in &mut self.pool[pool_index..] {
            *entry -= 1;
        }
        Ok(removed)
    }

    fn rebuild_pool(&mut self) {
        self.pool = self
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| self.filter.accepts(q))
            .map(|(i, _)| i)
            .collect();
    }
}
