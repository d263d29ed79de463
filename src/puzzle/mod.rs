//! Leveled word-guessing game.
//!
//! Each level reveals up to five clues for a secret word; guessing earlier
//! scores more. After every level the player is asked whether to quit.

pub mod engine;
pub mod level;
pub mod state;

pub use engine::{PuzzleEngine, PuzzleOutcome, SessionEnd};
pub use level::{CLUES_PER_LEVEL, Level, builtin_levels, load_levels, parse_levels};
pub use state::{
    LevelRound, LevelState, PuzzleSession, QuitStep, SCORE_TABLE, confirm_quit,
    points_for_attempt,
};
