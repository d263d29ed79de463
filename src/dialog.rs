//! Small prompt state machines used by the conversation loop.
//!
//! Each machine consumes one input line per step and never reads input
//! itself, so every transition can be tested without a terminal.

use crate::intent::normalize;
use crate::mood::Mood;

pub const VOICE_PROMPT: &str = "Hi! I'm your virtual assistant. Would you like me to respond with voice as well as text?(yes/no)";
pub const VOICE_REPROMPT: &str = "Please enter a valid input (yes/no).";
pub const VOICE_ON_REPLY: &str = "I'll respond with both text and voice.";
pub const VOICE_OFF_REPLY: &str = "I'll respond with text only.";
pub const ANOTHER_JOKE_PROMPT: &str = "Do you want to hear another joke (Yes/No)?";
pub const JOKE_CLOSING: &str = "Alright! Let me know if you need anything else.";

// ── Voice-mode prompt ───────────────────────────────────────────────────

/// Outcome of one answer to the voice-mode question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStep {
    /// Not one of yes/y/no/n; ask again.
    Reprompt,
    Decided { voice: bool },
}

/// Startup question deciding whether replies are also spoken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoicePrompt {
    decided: Option<bool>,
}

impl VoicePrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&mut self, input: &str) -> VoiceStep {
        if let Some(voice) = self.decided {
            return VoiceStep::Decided { voice };
        }
        match normalize(input).as_str() {
            "yes" | "y" => self.decide(true),
            "no" | "n" => self.decide(false),
            _ => VoiceStep::Reprompt,
        }
    }

    fn decide(&mut self, voice: bool) -> VoiceStep {
        self.decided = Some(voice);
        VoiceStep::Decided { voice }
    }

    /// The decision, once one was made.
    pub fn decision(&self) -> Option<bool> {
        self.decided
    }
}

// ── Joke follow-up ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpState {
    AwaitingDecision,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpStep {
    /// Tell another joke for the same mood, then ask again.
    AnotherJoke,
    /// Leave the sub-loop with the closing remark.
    Closed,
}

/// "Another joke?" loop after a joke. Only a lowercased "yes" continues; the
/// mood is fixed for the whole loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JokeFollowUp {
    mood: Mood,
    state: FollowUpState,
}

impl JokeFollowUp {
    pub fn new(mood: Mood) -> Self {
        Self {
            mood,
            state: FollowUpState::AwaitingDecision,
        }
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn state(&self) -> FollowUpState {
        self.state
    }

    pub fn step(&mut self, input: &str) -> FollowUpStep {
        if self.state == FollowUpState::Done {
            return FollowUpStep::Closed;
        }
        // Untrimmed: " yes" closes the loop.
        if input.to_lowercase() == "yes" {
            FollowUpStep::AnotherJoke
        } else {
            self.state = FollowUpState::Done;
            FollowUpStep::Closed
        }
    }
}
