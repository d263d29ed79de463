//! Joke catalogue.
//!
//! Jokes are an external collaborator behind [`JokeProvider`]. The built-in
//! provider ships two small categories and draws from their union for `All`.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::JokeError;

/// Fallback line shown whenever the provider fails.
pub const JOKE_FALLBACK: &str = "Sorry, I couldn't find a joke right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JokeCategory {
    Neutral,
    Chuck,
    All,
}

impl fmt::Display for JokeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Neutral => "neutral",
            Self::Chuck => "chuck",
            Self::All => "all",
        })
    }
}

/// Returns one joke for a category.
pub trait JokeProvider {
    fn get_joke(&mut self, category: JokeCategory) -> Result<String, JokeError>;
}

const NEUTRAL_JOKES: &[&str] = &[
    "There are only 10 kinds of people in this world: those who know binary and those who don't.",
    "A programmer's partner says: go to the store and buy a loaf of bread, and if they have eggs, buy a dozen. The programmer comes home with twelve loaves.",
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "I would tell you a UDP joke, but you might not get it.",
    "To understand recursion, you must first understand recursion.",
    "A SQL query walks into a bar, goes up to two tables and asks: may I join you?",
    "Why did the developer go broke? Because they used up all their cache.",
    "There's no place like 127.0.0.1.",
    "Debugging is like being the detective in a crime movie where you are also the murderer.",
    "Knock knock. Race condition. Who's there?",
];

const CHUCK_JOKES: &[&str] = &[
    "Chuck Norris can divide by zero.",
    "Chuck Norris doesn't use a debugger. The bugs confess.",
    "Chuck Norris counted to infinity. Twice.",
    "Chuck Norris writes code that optimizes itself.",
    "Chuck Norris's keyboard has no Ctrl key, because nothing controls Chuck Norris.",
    "When Chuck Norris throws an exception, it lands across the room.",
    "Chuck Norris can compile syntax errors.",
    "Chuck Norris doesn't need sudo. The system just does what he says.",
];

/// In-process joke catalogue with its own randomness.
pub struct BuiltinJokes {
    rng: StdRng,
}

impl BuiltinJokes {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Every joke in a category.
    pub fn catalogue(category: JokeCategory) -> Vec<&'static str> {
        match category {
            JokeCategory::Neutral => NEUTRAL_JOKES.to_vec(),
            JokeCategory::Chuck => CHUCK_JOKES.to_vec(),
            JokeCategory::All => NEUTRAL_JOKES.iter().chain(CHUCK_JOKES).copied().collect(),
        }
    }
}

impl Default for BuiltinJokes {
    fn default() -> Self {
        Self::new(None)
    }
}

impl JokeProvider for BuiltinJokes {
    fn get_joke(&mut self, category: JokeCategory) -> Result<String, JokeError> {
        Self::catalogue(category)
            .choose(&mut self.rng)
            .map(|joke| joke.to_string())
            .ok_or_else(|| JokeError::EmptyCategory {
                category: category.to_string(),
            })
    }
}
