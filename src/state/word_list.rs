//! Word list shown above the image.

use crate::config::FALLBACK_WORDS;
use crate::error::{AppError, Result};
use log::{error, info};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::Path;

/// Immutable, never-empty list of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Reads a newline-delimited word file, falling back to a fixed list
    /// when the file cannot be read or holds no words.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(list) => {
                info!("Loaded {} words from {}", list.len(), path.display());
                list
            }
            Err(e) => {
                error!("{}", e);
                Self::fallback()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| AppError::WordList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_text(&text).ok_or_else(|| AppError::WordList {
            path: path.to_path_buf(),
            reason: "no words found".to_string(),
        })
    }

    /// Non-empty, trimmed lines of `text`; `None` if there are none.
    pub fn from_text(text: &str) -> Option<Self> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        (!words.is_empty()).then_some(Self { words })
    }

    pub fn fallback() -> Self {
        Self {
            words: FALLBACK_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[cfg(test)]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Picks exactly `n` words.
    ///
    /// Without replacement when the list has at least `n` entries, with
    /// replacement otherwise.
    pub fn pick<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<String> {
        if self.words.len() >= n {
            self.words.choose_multiple(rng, n).cloned().collect()
        } else {
            (0..n)
                .filter_map(|_| self.words.choose(rng).cloned())
                .collect()
        }
    }
}
