//! Session driver for the word puzzle.
//!
//! Plays levels in order, asking after each one whether to quit. Errors never
//! escape: a failed read inside a level scores that level 0, an interrupt or
//! closed input abandons the whole session.

use serde::Serialize;

use crate::error::InputError;
use crate::input::InputSource;
use crate::message::{BotMessage, MessageSink};

use super::level::Level;
use super::state::{LevelRound, LevelState, PuzzleSession, QuitStep, confirm_quit};

pub const GUESS_PROMPT: &str = "You:";
pub const QUIT_PROMPT: &str = "Do you want to quit the game? (Yes/No)";
pub const QUIT_REPROMPT: &str = "Invalid input. Please enter 'Yes' or 'No'.";
pub const QUIT_CONFIRMED: &str = "You chose to quit the game. Your progress will not be saved.";
pub const ABANDONED: &str = "You exited the game unexpectedly. Your progress will not be saved.";

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// Every level was played.
    Completed,
    /// The player answered "yes" to the quit question.
    Quit,
    /// Interrupted or input closed.
    Abandoned,
    /// An error outside any level.
    Failed(String),
}

/// Summary of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleOutcome {
    pub score: u32,
    pub levels_played: usize,
    pub end: SessionEnd,
}

/// Runs puzzle sessions over a fixed level list.
#[derive(Debug, Clone)]
pub struct PuzzleEngine {
    levels: Vec<Level>,
}

impl PuzzleEngine {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Play one session and return the final score. Never fails.
    pub fn run(&self, input: &mut dyn InputSource, sink: &dyn MessageSink) -> u32 {
        self.play(input, sink).score
    }

    /// Play one session and report how it went.
    pub fn play(&self, input: &mut dyn InputSource, sink: &dyn MessageSink) -> PuzzleOutcome {
        let mut session = PuzzleSession::new();
        let mut levels_played = 0;

        while let Some(level) = self.levels.get(session.level() - 1) {
            let points = match self.play_level(session.level(), level, input, sink) {
                Ok(points) => points,
                Err(e) if e.ends_session() => {
                    return self.abandon(&session, levels_played, sink);
                }
                Err(e) => {
                    tracing::warn!(level = session.level(), error = %e, "puzzle level aborted");
                    sink.emit(&BotMessage::game(format!("An error occurred in this level: {e}")));
                    0
                }
            };
            levels_played += 1;
            session.award(points);
            sink.emit(&BotMessage::game(format!(
                "Your total score so far: {}",
                session.score()
            )));

            match self.ask_quit(input, sink) {
                Ok(true) => {
                    sink.emit(&BotMessage::game(QUIT_CONFIRMED));
                    return self.finish(&session, levels_played, SessionEnd::Quit, sink);
                }
                Ok(false) => session.advance(),
                Err(e) if e.ends_session() => {
                    return self.abandon(&session, levels_played, sink);
                }
                Err(e) => {
                    sink.emit(&BotMessage::game(format!("An unexpected error occurred: {e}")));
                    return PuzzleOutcome {
                        score: session.score(),
                        levels_played,
                        end: SessionEnd::Failed(e.to_string()),
                    };
                }
            }
        }

        self.finish(&session, levels_played, SessionEnd::Completed, sink)
    }

    fn play_level(
        &self,
        number: usize,
        level: &Level,
        input: &mut dyn InputSource,
        sink: &dyn MessageSink,
    ) -> Result<u32, InputError> {
        sink.emit(&BotMessage::game("Welcome to the WORD PUZZLE Game!"));
        sink.emit(&BotMessage::game(format!("Level {number}: Solve the puzzle!")));

        let mut round = LevelRound::new(level);
        while let Some((i, clue)) = round.current_clue() {
            sink.emit(&BotMessage::game(format!("Clue {}: {clue}", i + 1)));
            sink.emit(&BotMessage::prompt(GUESS_PROMPT));
            let guess = input.read_line()?;
            round.guess(&guess);
        }

        let state = round.state();
        match state {
            LevelState::Correct { points, .. } => {
                sink.emit(&BotMessage::game(format!("Correct! You got {points} points!")));
            }
            _ => {
                sink.emit(&BotMessage::game(format!(
                    "Sorry, The correct word was {}. You failed this level.",
                    level.word()
                )));
            }
        }
        tracing::debug!(level = number, ?state, "puzzle level finished");
        Ok(state.points())
    }

    /// Ask until the answer is yes or no. `Ok(true)` means quit.
    fn ask_quit(&self, input: &mut dyn InputSource, sink: &dyn MessageSink) -> Result<bool, InputError> {
        loop {
            sink.emit(&BotMessage::prompt(QUIT_PROMPT));
            match confirm_quit(&input.read_line()?) {
                QuitStep::Quit => return Ok(true),
                QuitStep::Continue => return Ok(false),
                QuitStep::Reprompt => sink.emit(&BotMessage::game(QUIT_REPROMPT)),
            }
        }
    }

    fn finish(
        &self,
        session: &PuzzleSession,
        levels_played: usize,
        end: SessionEnd,
        sink: &dyn MessageSink,
    ) -> PuzzleOutcome {
        sink.emit(&BotMessage::game(format!(
            "The game is over! Your final score is {} points.",
            session.score()
        )));
        PuzzleOutcome {
            score: session.score(),
            levels_played,
            end,
        }
    }

    fn abandon(
        &self,
        session: &PuzzleSession,
        levels_played: usize,
        sink: &dyn MessageSink,
    ) -> PuzzleOutcome {
        sink.emit(&BotMessage::game(ABANDONED));
        PuzzleOutcome {
            score: session.score(),
            levels_played,
            end: SessionEnd::Abandoned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ScriptStep, ScriptedInput};
    use crate::message::VecSink;
    use crate::puzzle::level::builtin_levels;

    fn engine() -> PuzzleEngine {
        PuzzleEngine::new(builtin_levels().unwrap())
    }

    fn two_levels() -> PuzzleEngine {
        let mut levels = builtin_levels().unwrap();
        levels.truncate(2);
        PuzzleEngine::new(levels)
    }

    #[test]
    fn quit_after_first_level() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::new(["cat", "fish", "dog", "yes"]);
        let outcome = engine().play(&mut input, &sink);

        assert_eq!(outcome.score, 4);
        assert_eq!(outcome.levels_played, 1);
        assert_eq!(outcome.end, SessionEnd::Quit);
        let texts = sink.texts();
        assert!(texts.contains(&"Correct! You got 4 points!".to_string()));
        assert!(texts.contains(&"Your total score so far: 4".to_string()));
        assert_eq!(
            texts.last().map(String::as_str),
            Some("The game is over! Your final score is 4 points.")
        );
    }

    #[test]
    fn invalid_quit_answers_reprompt_without_state_change() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::new(["dog", "maybe", "y", "YES"]);
        let outcome = engine().play(&mut input, &sink);

        assert_eq!(outcome.score, 10);
        assert_eq!(outcome.levels_played, 1);
        let reprompts = sink.texts().iter().filter(|t| *t == QUIT_REPROMPT).count();
        assert_eq!(reprompts, 2);
    }

    #[test]
    fn failing_a_level_reveals_the_word() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::new(["a", "b", "c", "d", "e", "yes"]);
        let score = engine().run(&mut input, &sink);

        assert_eq!(score, 0);
        assert!(
            sink.texts()
                .contains(&"Sorry, The correct word was dog. You failed this level.".to_string())
        );
    }

    #[test]
    fn completing_every_level() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::new(["dog", "no", "x", "ball", "no"]);
        let outcome = two_levels().play(&mut input, &sink);

        assert_eq!(outcome.score, 16);
        assert_eq!(outcome.levels_played, 2);
        assert_eq!(outcome.end, SessionEnd::Completed);
        assert!(sink.texts().contains(&"Level 2: Solve the puzzle!".to_string()));
    }

    #[test]
    fn read_error_scores_level_zero_and_continues() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::from_steps([
            ScriptStep::Line("cat".into()),
            ScriptStep::Fail("terminal hiccup".into()),
            ScriptStep::Line("no".into()),
            ScriptStep::Line("ball".into()),
            ScriptStep::Line("no".into()),
        ]);
        let outcome = two_levels().play(&mut input, &sink);

        assert_eq!(outcome.score, 10);
        assert_eq!(outcome.levels_played, 2);
        assert_eq!(outcome.end, SessionEnd::Completed);
        assert!(
            sink.texts()
                .iter()
                .any(|t| t.starts_with("An error occurred in this level:"))
        );
    }

    #[test]
    fn interrupt_abandons_the_session() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::from_steps([
            ScriptStep::Line("dog".into()),
            ScriptStep::Line("no".into()),
            ScriptStep::Interrupt,
        ]);
        let outcome = engine().play(&mut input, &sink);

        assert_eq!(outcome.end, SessionEnd::Abandoned);
        assert_eq!(outcome.score, 10);
        assert_eq!(sink.texts().last().map(String::as_str), Some(ABANDONED));
        assert!(
            !sink
                .texts()
                .iter()
                .any(|t| t.starts_with("The game is over!"))
        );
    }

    #[test]
    fn closed_input_during_quit_prompt_abandons() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::new(["dog"]);
        let outcome = engine().play(&mut input, &sink);
        assert_eq!(outcome.end, SessionEnd::Abandoned);
        assert_eq!(outcome.levels_played, 1);
    }

    #[test]
    fn io_error_in_quit_prompt_fails_the_session() {
        let sink = VecSink::new();
        let mut input = ScriptedInput::from_steps([
            ScriptStep::Line("dog".into()),
            ScriptStep::Fail("gone".into()),
        ]);
        let outcome = engine().play(&mut input, &sink);
        assert!(matches!(outcome.end, SessionEnd::Failed(_)));
        assert_eq!(outcome.score, 10);
    }
}
