//! Coarse mood detection from utterance text.
//!
//! The conversation only needs a three-way label to pick a joke category, so
//! the default classifier is a small polarity lexicon: each sentiment word has
//! a score in [-1, 1], a preceding negation flips and dampens it, a preceding
//! intensifier amplifies it, and the utterance polarity is the mean over the
//! sentiment words found.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoodError;
use crate::jokes::JokeCategory;

/// Polarity above which an utterance reads as happy.
pub const HAPPY_THRESHOLD: f32 = 0.2;
/// Polarity below which an utterance reads as sad.
pub const SAD_THRESHOLD: f32 = -0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
}

impl Mood {
    /// Bucket a polarity score.
    pub fn from_polarity(polarity: f32) -> Self {
        if polarity > HAPPY_THRESHOLD {
            Self::Happy
        } else if polarity < SAD_THRESHOLD {
            Self::Sad
        } else {
            Self::Neutral
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😄",
            Self::Sad => "😞",
            Self::Neutral => "😐",
        }
    }

    /// Joke category told for this mood: happy gets the clean "neutral" set,
    /// sad gets Chuck Norris.
    pub fn joke_category(self) -> JokeCategory {
        match self {
            Self::Happy => JokeCategory::Neutral,
            Self::Sad => JokeCategory::Chuck,
            Self::Neutral => JokeCategory::All,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
        })
    }
}

/// Maps an utterance to a mood.
pub trait MoodClassifier {
    fn classify_mood(&self, text: &str) -> Result<Mood, MoodError>;
}

// ── Lexicon classifier ──────────────────────────────────────────────────

/// (word, polarity)
const LEXICON: &[(&str, f32)] = &[
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("brilliant", 0.9),
    ("cheerful", 0.8),
    ("cool", 0.35),
    ("delighted", 0.7),
    ("enjoy", 0.4),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("fantastic", 0.4),
    ("fun", 0.3),
    ("funny", 0.25),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("laugh", 0.3),
    ("love", 0.5),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("please", 0.2),
    ("wonderful", 1.0),
    ("angry", -0.5),
    ("annoyed", -0.4),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("depressed", -0.6),
    ("down", -0.15),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("lonely", -0.5),
    ("miserable", -1.0),
    ("sad", -0.5),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("unhappy", -0.6),
    ("upset", -0.5),
    ("worst", -1.0),
    ("worse", -0.4),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "don't", "isn't", "wasn't", "can't", "nothing"];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("extremely", 1.5),
    ("super", 1.4),
];

/// Lexicon-based polarity scorer, the default mood classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconMoodClassifier;

impl LexiconMoodClassifier {
    /// Mean polarity of the sentiment words in `text`, in [-1, 1].
    pub fn polarity(&self, text: &str) -> f32 {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut total = 0.0;
        let mut hits = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&(_, base)) = LEXICON.iter().find(|(w, _)| w == token) else {
                continue;
            };
            let mut score = base;
            if let Some(prev) = i.checked_sub(1).map(|p| tokens[p]) {
                if let Some(&(_, factor)) = INTENSIFIERS.iter().find(|(w, _)| *w == prev) {
                    score *= factor;
                }
            }
            // Negation may sit one word further back ("not very good").
            let window = &tokens[i.saturating_sub(2)..i];
            if window.iter().any(|w| NEGATIONS.contains(w)) {
                score *= -0.5;
            }
            total += score.clamp(-1.0, 1.0);
            hits += 1;
        }

        if hits == 0 { 0.0 } else { total / hits as f32 }
    }
}

impl MoodClassifier for LexiconMoodClassifier {
    fn classify_mood(&self, text: &str) -> Result<Mood, MoodError> {
        let polarity = self.polarity(text);
        if !polarity.is_finite() {
            return Err(MoodError::Classify {
                message: format!("non-finite polarity for {text:?}"),
            });
        }
        tracing::debug!(polarity, "mood polarity");
        Ok(Mood::from_polarity(polarity))
    }
}

/// Always answers with the same mood. Handy for tests and `--seed` runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedMood(pub Mood);

impl MoodClassifier for FixedMood {
    fn classify_mood(&self, _text: &str) -> Result<Mood, MoodError> {
        Ok(self.0)
    }
}
