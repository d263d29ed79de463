//! Intent classification for user utterances.
//!
//! Rule-based classification over a fixed, ordered pattern table. The table is
//! data rather than a chain of conditionals so every rule can be enumerated and
//! exercised on its own. Rules are tried in priority order; first match wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Classified purpose of one utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    HowAreYou,
    AskName,
    AskCreator,
    RequestJoke,
    RequestHelp,
    PlayGame,
    Exit,
    Unknown,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::HowAreYou => "how_are_you",
            Self::AskName => "ask_name",
            Self::AskCreator => "ask_creator",
            Self::RequestJoke => "request_joke",
            Self::RequestHelp => "request_help",
            Self::PlayGame => "play_game",
            Self::Exit => "exit",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal utterances that greet the bot.
pub const GREETING_LITERALS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Literal utterances that end the conversation.
pub const EXIT_LITERALS: &[&str] = &["exit", "quit", "bye"];

/// How a rule tests a normalized utterance.
#[derive(Debug)]
pub enum Matcher {
    /// Whole-utterance membership in a fixed set.
    Exact(&'static [&'static str]),
    /// Regex search anywhere in the utterance. Alternatives are `|`-joined.
    Search(Regex),
}

impl Matcher {
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Self::Exact(literals) => literals.contains(&normalized),
            Self::Search(re) => re.is_match(normalized),
        }
    }
}

/// One row of the pattern table.
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub matcher: Matcher,
}

fn search(pattern: &str) -> Matcher {
    Matcher::Search(Regex::new(pattern).unwrap())
}

static PATTERN_TABLE: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule {
            intent: Intent::Greeting,
            matcher: Matcher::Exact(GREETING_LITERALS),
        },
        IntentRule {
            intent: Intent::HowAreYou,
            matcher: search(r"how are you|how do you feel|how are you doing"),
        },
        IntentRule {
            intent: Intent::AskName,
            matcher: search(r"what's your name|who are you|what is your name"),
        },
        IntentRule {
            intent: Intent::AskCreator,
            matcher: search(
                r"who created|who made|creator|creator's name|made you|your creator",
            ),
        },
        IntentRule {
            intent: Intent::RequestJoke,
            matcher: search(r"tell me a joke|make me laugh|tell a joke|joke"),
        },
        IntentRule {
            intent: Intent::PlayGame,
            matcher: Matcher::Exact(&["play game"]),
        },
        IntentRule {
            intent: Intent::RequestHelp,
            matcher: search(
                r"i need help|can you assist me|i need your help|please help|can you help|assist me|help",
            ),
        },
        IntentRule {
            intent: Intent::Exit,
            matcher: Matcher::Exact(EXIT_LITERALS),
        },
    ]
});

/// The ordered rule table, highest priority first.
pub fn pattern_table() -> &'static [IntentRule] {
    &PATTERN_TABLE
}

/// Trim and lowercase an utterance before matching.
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Classify an utterance. Pure: reads only the static pattern table.
pub fn classify(utterance: &str) -> Intent {
    let normalized = normalize(utterance);
    pattern_table()
        .iter()
        .find(|rule| rule.matcher.matches(&normalized))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown)
}
