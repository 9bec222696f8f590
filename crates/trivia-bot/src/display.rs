//! The overlay text file that streaming software shows on screen.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::error;

use crate::error::{BotError, BotResult};
use crate::round;

/// Prefix of every non-empty display line.
pub const DISPLAY_PREFIX: &str = "Trivia: ";

/// A single-line text file overwritten on each update.
///
/// Each write holds the content on screen until a deadline; periodic
/// refreshes check [`DisplayFile::is_due`] first. With no path the contents
/// are only kept in memory.
#[derive(Debug, Clone, Default)]
pub struct DisplayFile {
    path: Option<PathBuf>,
    contents: String,
    hold_until: Option<DateTime<Utc>>,
}

impl DisplayFile {
    /// A display file at `path`, or in memory only.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            contents: String::new(),
            hold_until: None,
        }
    }

    /// Where the file lives.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Last written contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Whether the hold from the last write has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.hold_until.is_none_or(|t| now >= t)
    }

    /// Show `line` and hold it for `hold`.
    pub fn write(&mut self, line: &str, hold: TimeDelta, now: DateTime<Utc>) -> BotResult<()> {
        let contents = if line.is_empty() {
            String::new()
        } else {
            format!("{DISPLAY_PREFIX}{line}")
        };
        self.put(contents)?;
        self.hold_until = Some(round::offset(now, hold));
        Ok(())
    }

    /// Empty the file and drop any hold.
    pub fn clear(&mut self) -> BotResult<()> {
        self.put(String::new())?;
        self.hold_until = None;
        Ok(())
    }

    /// Drop the hold so the next refresh happens at once.
    pub fn release(&mut self) {
        self.hold_until = None;
    }

    fn put(&mut self, contents: String) -> BotResult<()> {
        if let Some(path) = &self.path {
            fs::write(path, &contents).map_err(|source| {
                error!(path = %path.display(), error = %source, "failed to write display file");
                BotError::Persistence {
                    path: path.clone(),
                    source,
                }
            })?;
        }
        self.contents = contents;
        Ok(())
    }
}
