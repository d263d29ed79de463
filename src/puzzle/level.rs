//! Puzzle level definitions.
//!
//! Levels are parsed from TOML once at startup (bundled or user-supplied) and
//! stay immutable for the rest of the run.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PuzzleError, PuzzleResult};
use crate::intent::normalize;

/// Clues per level; one more is revealed after each wrong guess.
pub const CLUES_PER_LEVEL: usize = 5;

const BUNDLED_LEVELS_TOML: &str = include_str!("../../data/puzzles/levels.toml");

/// One level: a secret word and its clues in reveal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    word: String,
    clues: [String; CLUES_PER_LEVEL],
}

impl Level {
    /// Validate and build a level. `number` is 1-based and only used in errors.
    pub fn new(number: usize, word: &str, clues: Vec<String>) -> PuzzleResult<Self> {
        let word = normalize(word);
        if word.is_empty() {
            return Err(PuzzleError::EmptyWord { level: number });
        }
        let count = clues.len();
        let clues: [String; CLUES_PER_LEVEL] =
            clues.try_into().map_err(|_| PuzzleError::ClueCount {
                level: number,
                word: word.clone(),
                count,
                expected: CLUES_PER_LEVEL,
            })?;
        Ok(Self { word, clues })
    }

    /// The secret word, trimmed and lowercased.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn clues(&self) -> &[String; CLUES_PER_LEVEL] {
        &self.clues
    }

    /// Case-insensitive, whitespace-insensitive comparison with the secret.
    pub fn is_solution(&self, guess: &str) -> bool {
        normalize(guess) == self.word
    }
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LevelsToml {
    #[serde(default, rename = "level")]
    levels: Vec<LevelToml>,
}

#[derive(Debug, Deserialize)]
struct LevelToml {
    word: String,
    clues: Vec<String>,
}

/// Parse `[[level]]` tables. `origin` names the source in errors.
pub fn parse_levels(toml_str: &str, origin: &str) -> PuzzleResult<Vec<Level>> {
    let parsed: LevelsToml = toml::from_str(toml_str).map_err(|e| PuzzleError::Load {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    if parsed.levels.is_empty() {
        return Err(PuzzleError::NoLevels {
            path: origin.to_string(),
        });
    }
    parsed
        .levels
        .into_iter()
        .enumerate()
        .map(|(i, raw)| Level::new(i + 1, &raw.word, raw.clues))
        .collect()
}

/// Load levels from a user-supplied file.
pub fn load_levels(path: &Path) -> PuzzleResult<Vec<Level>> {
    let origin = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| PuzzleError::Load {
        path: origin.clone(),
        message: e.to_string(),
    })?;
    parse_levels(&content, &origin)
}

/// The five levels shipped with banter.
pub fn builtin_levels() -> PuzzleResult<Vec<Level>> {
    parse_levels(BUNDLED_LEVELS_TOML, "(bundled levels)")
}
