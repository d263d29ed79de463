//! Puzzle state machines: one level round, the quit confirmation, and the
//! session score.

use super::level::{CLUES_PER_LEVEL, Level};
use crate::intent::normalize;

/// Points for a correct guess following clue `i` (0-based).
pub const SCORE_TABLE: [u32; CLUES_PER_LEVEL] = [10, 6, 4, 2, 1];

/// Points awarded for solving after clue index `attempt`; 0 past the table.
pub fn points_for_attempt(attempt: usize) -> u32 {
    SCORE_TABLE.get(attempt).copied().unwrap_or(0)
}

// ── Level round ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    /// Clue `i` is showing and a guess is expected.
    ClueReveal(usize),
    Correct { attempt: usize, points: u32 },
    Failed,
}

impl LevelState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::ClueReveal(_))
    }

    pub fn points(self) -> u32 {
        match self {
            Self::Correct { points, .. } => points,
            _ => 0,
        }
    }
}

/// One playthrough of a level.
#[derive(Debug, Clone)]
pub struct LevelRound<'a> {
    level: &'a Level,
    state: LevelState,
}

impl<'a> LevelRound<'a> {
    pub fn new(level: &'a Level) -> Self {
        Self {
            level,
            state: LevelState::ClueReveal(0),
        }
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn level(&self) -> &'a Level {
        self.level
    }

    /// `(index, clue)` currently shown, while a guess is expected.
    pub fn current_clue(&self) -> Option<(usize, &'a str)> {
        match self.state {
            LevelState::ClueReveal(i) => Some((i, self.level.clues()[i].as_str())),
            _ => None,
        }
    }

    /// Apply one guess. Guesses after a terminal state are ignored.
    pub fn guess(&mut self, guess: &str) -> LevelState {
        let LevelState::ClueReveal(i) = self.state else {
            return self.state;
        };
        self.state = if self.level.is_solution(guess) {
            LevelState::Correct {
                attempt: i,
                points: points_for_attempt(i),
            }
        } else if i + 1 < CLUES_PER_LEVEL {
            LevelState::ClueReveal(i + 1)
        } else {
            LevelState::Failed
        };
        self.state
    }
}

// ── Quit confirmation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitStep {
    /// Neither yes nor no; ask again, nothing changes.
    Reprompt,
    Quit,
    Continue,
}

/// "Do you want to quit the game?" after every level. Accepts exactly `yes` or
/// `no`, ignoring case and surrounding whitespace.
pub fn confirm_quit(input: &str) -> QuitStep {
    match normalize(input).as_str() {
        "yes" => QuitStep::Quit,
        "no" => QuitStep::Continue,
        _ => QuitStep::Reprompt,
    }
}

// ── Session ─────────────────────────────────────────────────────────────

/// Level index and running score for one session. The score never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleSession {
    level: usize,
    score: u32,
}

impl PuzzleSession {
    pub fn new() -> Self {
        Self { level: 1, score: 0 }
    }

    /// Current level number, 1-based.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    pub fn advance(&mut self) {
        self.level += 1;
    }
}

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog() -> Level {
        Level::new(
            1,
            "dog",
            vec![
                "The best friend of humans.".into(),
                "It barks and can be a pet.".into(),
                "It loves to fetch a ball.".into(),
                "Common breeds include Labrador, Beagle, and Poodle.".into(),
                "It has four legs and a tail.".into(),
            ],
        )
        .unwrap()
    }

    fn play(level: &Level, guesses: &[&str]) -> LevelState {
        let mut round = LevelRound::new(level);
        for g in guesses {
            round.guess(g);
        }
        round.state()
    }

    #[test]
    fn score_by_attempt() {
        let level = dog();
        let wrong = ["cat", "fish", "bird", "cow"];
        for (attempt, expected) in SCORE_TABLE.iter().enumerate() {
            let mut guesses: Vec<&str> = wrong[..attempt].to_vec();
            guesses.push("dog");
            assert_eq!(play(&level, &guesses).points(), *expected, "attempt {attempt}");
        }
    }

    #[test]
    fn third_guess_is_worth_four() {
        let state = play(&dog(), &["cat", "fish", "dog"]);
        assert_eq!(state, LevelState::Correct { attempt: 2, points: 4 });
    }

    #[test]
    fn five_misses_fail() {
        let state = play(&dog(), &["a", "b", "c", "d", "e"]);
        assert_eq!(state, LevelState::Failed);
        assert_eq!(state.points(), 0);
    }

    #[test]
    fn clues_reveal_in_order() {
        let level = dog();
        let mut round = LevelRound::new(&level);
        assert_eq!(round.current_clue(), Some((0, "The best friend of humans.")));
        assert_eq!(round.guess("cat"), LevelState::ClueReveal(1));
        assert_eq!(round.current_clue(), Some((1, "It barks and can be a pet.")));
        round.guess(" DOG ");
        assert_eq!(round.current_clue(), None);
        // Terminal states absorb further guesses.
        assert_eq!(
            round.guess("dog"),
            LevelState::Correct { attempt: 1, points: 6 }
        );
    }

    #[test]
    fn quit_confirmation_only_takes_yes_or_no() {
        assert_eq!(confirm_quit("Yes"), QuitStep::Quit);
        assert_eq!(confirm_quit("  NO "), QuitStep::Continue);
        for input in ["y", "n", "yes please", "", "quit"] {
            assert_eq!(confirm_quit(input), QuitStep::Reprompt, "{input:?}");
        }
    }

    #[test]
    fn session_score_is_monotonic() {
        let mut session = PuzzleSession::new();
        assert_eq!((session.level(), session.score()), (1, 0));
        session.award(4);
        session.award(0);
        assert_eq!(session.award(10), 14);
        session.advance();
        assert_eq!(session.level(), 2);
        assert_eq!(points_for_attempt(7), 0);
    }
}
