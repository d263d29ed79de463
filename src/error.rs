//! Rich diagnostic error types for banter.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know what went wrong and how to
//! fix it. Collaborator failures (mood, jokes) are recovered locally and only
//! ever show up in the logs.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for banter.
///
/// Each variant wraps a subsystem-specific error, preserving the diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum BanterError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Puzzle(#[from] PuzzleError),
}

pub type BanterResult<T> = std::result::Result<T, BanterError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(banter::config::read),
        help("Check that the file exists and is readable, or omit --config to use defaults.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file: {path}")]
    #[diagnostic(
        code(banter::config::write),
        help("Check that the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(banter::config::parse),
        help(
            "The file must be valid TOML. Every key is optional; \
             recognised sections are [bot], [speech] and [puzzle]."
        )
    )]
    Parse { path: String, message: String },

    #[error("cannot determine home directory")]
    #[diagnostic(
        code(banter::config::no_home),
        help("Set HOME or XDG_CONFIG_HOME, or pass --config explicitly.")
    )]
    NoHome,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("input interrupted")]
    #[diagnostic(
        code(banter::input::interrupted),
        help("Ctrl-C was pressed. Press it again to terminate immediately.")
    )]
    Interrupted,

    #[error("input closed")]
    #[diagnostic(
        code(banter::input::closed),
        help("Standard input reached end-of-file; there is nothing more to read.")
    )]
    Closed,

    #[error("failed to read input: {source}")]
    #[diagnostic(
        code(banter::input::io),
        help("The terminal or pipe feeding banter returned an I/O error.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Whether this error means no further input will arrive.
    pub fn ends_session(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Closed)
    }
}

pub type InputResult<T> = std::result::Result<T, InputError>;

// ---------------------------------------------------------------------------
// Puzzle errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PuzzleError {
    #[error("level {level} (\"{word}\") has {count} clues, expected {expected}")]
    #[diagnostic(
        code(banter::puzzle::clue_count),
        help("Every level needs exactly five clues, revealed one per wrong guess.")
    )]
    ClueCount {
        level: usize,
        word: String,
        count: usize,
        expected: usize,
    },

    #[error("level {level} has an empty secret word")]
    #[diagnostic(
        code(banter::puzzle::empty_word),
        help("Give the level a non-empty `word = \"...\"` entry.")
    )]
    EmptyWord { level: usize },

    #[error("puzzle file {path} defines no levels")]
    #[diagnostic(
        code(banter::puzzle::no_levels),
        help("Add at least one [[level]] table, or remove puzzle.levels_file to use the built-in levels.")
    )]
    NoLevels { path: String },

    #[error("failed to load puzzle file {path}: {message}")]
    #[diagnostic(
        code(banter::puzzle::load),
        help("Check that the file exists and is valid TOML with [[level]] tables.")
    )]
    Load { path: String, message: String },
}

pub type PuzzleResult<T> = std::result::Result<T, PuzzleError>;

// ---------------------------------------------------------------------------
// Collaborator errors (recovered locally)
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum MoodError {
    #[error("mood classification failed: {message}")]
    #[diagnostic(
        code(banter::mood::classify),
        help("The utterance is treated as neutral when classification fails.")
    )]
    Classify { message: String },
}

#[derive(Debug, Error, Diagnostic)]
pub enum JokeError {
    #[error("no jokes available in category \"{category}\"")]
    #[diagnostic(
        code(banter::jokes::empty_category),
        help("Add jokes to the category or pick another one.")
    )]
    EmptyCategory { category: String },

    #[error("joke provider failed: {message}")]
    #[diagnostic(
        code(banter::jokes::provider),
        help("A fallback line is shown instead of a joke.")
    )]
    Provider { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_and_closed_end_the_session() {
        assert!(InputError::Interrupted.ends_session());
        assert!(InputError::Closed.ends_session());
        let io = InputError::Io {
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        assert!(!io.ends_session());
    }

    #[test]
    fn top_level_error_is_transparent() {
        let err: BanterError = PuzzleError::EmptyWord { level: 2 }.into();
        assert_eq!(err.to_string(), "level 2 has an empty secret word");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("banter::puzzle::empty_word")
        );
    }
}
