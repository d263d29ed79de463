//! Reply selection per intent.
//!
//! Randomized replies draw from an injected `RngCore`, and the greeting bucket
//! from an injected clock, so tests can pin both.

use chrono::Timelike;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::intent::Intent;
use crate::jokes::{JOKE_FALLBACK, JokeProvider};
use crate::memory::{CREATOR_INFO, MemoryStore};
use crate::mood::{Mood, MoodClassifier};

pub const HOW_ARE_YOU_REPLY: &str = "I'm just a digital creation, but I'm here to help you!";
pub const NAME_REPLY: &str =
    "I don't have a specific name, but you can call me whatever you'd like.";
pub const HELP_REPLY: &str =
    "I will try to help you with my knowledge. What do you need assistance with?";
pub const PUZZLE_INTRO: &str = "Hi! Let's play a word puzzle game.";
pub const FAREWELL: &str = "Bye! Have a great day!";

pub const MORNING_GREETINGS: &[&str] = &[
    "Hope you had a restful sleep.☀️",
    "A brand new day is here.🌸",
    "Let's make today awesome!🌟",
    "How are you feeling today?",
    "Ready to start your day?🌞",
    "Good to see you this morning!🌞",
    "Wakey wakey! It's a beautiful morning.🌞",
    "Rise and shine! Another day to do great things.",
    "What are your plans for today?",
    "The sun's out! Let’s get going!",
];

pub const AFTERNOON_GREETINGS: &[&str] = &[
    "How’s your day going so far?",
    "Hope your day has been productive.",
    "Ready to continue your day?",
    "What’s new with you today?",
    "I hope everything is going well.",
    "Got anything exciting planned?",
    "How’s the afternoon treating you?",
    "I hope you're having a great afternoon!",
    "Still going strong this afternoon?",
    "How’s everything going this afternoon?",
];

pub const EVENING_GREETINGS: &[&str] = &[
    "How was your day?",
    "I hope you had a great day.",
    "Time to relax and unwind.",
    "What did you do today?",
    "How can I help you tonight?",
    "What’s on your mind?",
    "The day is winding down, how was it?",
    "I hope you enjoyed your day!",
    "Anything interesting today?",
    "Time to relax! How can I assist you this evening?",
];

pub const UNEXPECTED_RESPONSES: &[&str] = &[
    "Oops, I'm not sure what you mean. Can you try again?",
    "I didn't quite catch that! Can you explain it again?",
    "Hmm, that's a new one! But I'm not sure how to respond to that.",
    "I don't understand that. But I'm still here to chat!",
    "Interesting... but I'm not sure how to reply. Maybe try something else?",
    "I think I need more coffee! I didn't get that.",
    "Sorry, my circuits are a little confused. Can you ask something else?",
    "That's a great question... but I have no idea how to answer it! 😅",
    "Well, that’s outside of my knowledge range. Can we talk about something else?",
    "Uh-oh! I'm stumped. But feel free to ask me anything else!",
];

/// Time-of-day bucket for greetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    /// Hours 0-11 are morning, 12-17 afternoon, the rest evening.
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 18 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Self::Morning => "Good Morning!",
            Self::Afternoon => "Good Afternoon!",
            Self::Evening => "Good Evening!",
        }
    }

    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::Morning => MORNING_GREETINGS,
            Self::Afternoon => AFTERNOON_GREETINGS,
            Self::Evening => EVENING_GREETINGS,
        }
    }
}

/// "<header> <phrase>" for the bucket containing `hour`.
pub fn greeting<R: Rng + ?Sized>(hour: u32, rng: &mut R) -> String {
    let part = DayPart::from_hour(hour);
    let phrase = part.phrases().choose(rng).copied().unwrap_or_default();
    format!("{} {phrase}", part.header())
}

/// One of the fixed apology lines.
pub fn fallback<R: Rng + ?Sized>(rng: &mut R) -> String {
    UNEXPECTED_RESPONSES
        .choose(rng)
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// Current local wall-clock hour.
pub fn local_hour() -> u32 {
    chrono::Local::now().hour()
}

/// Picks or composes the reply for a classified utterance.
pub struct Responder {
    creator: String,
    moods: Box<dyn MoodClassifier>,
    jokes: Box<dyn JokeProvider>,
    rng: Box<dyn RngCore>,
    clock: Box<dyn Fn() -> u32>,
}

impl Responder {
    pub fn new(
        creator: impl Into<String>,
        moods: Box<dyn MoodClassifier>,
        jokes: Box<dyn JokeProvider>,
        rng: Box<dyn RngCore>,
    ) -> Self {
        Self {
            creator: creator.into(),
            moods,
            jokes,
            rng,
            clock: Box::new(local_hour),
        }
    }

    /// Replace the wall clock with a fixed hour source.
    pub fn with_clock(mut self, clock: impl Fn() -> u32 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Reply for `intent`. Writes the creator fact to `memory` on first use.
    ///
    /// `PlayGame` and `Exit` are normally intercepted by the conversation
    /// loop; answering them here keeps the function total.
    pub fn respond(&mut self, intent: Intent, utterance: &str, memory: &mut MemoryStore) -> String {
        match intent {
            Intent::Greeting => greeting((self.clock)(), &mut *self.rng),
            Intent::HowAreYou => HOW_ARE_YOU_REPLY.to_string(),
            Intent::AskName => NAME_REPLY.to_string(),
            Intent::RequestHelp => HELP_REPLY.to_string(),
            Intent::AskCreator => {
                let creator = &self.creator;
                memory
                    .get_or_insert_with(CREATOR_INFO, || creator.clone())
                    .to_string()
            }
            Intent::RequestJoke => self.tell_joke(utterance).1,
            Intent::PlayGame => PUZZLE_INTRO.to_string(),
            Intent::Exit => FAREWELL.to_string(),
            Intent::Unknown => fallback(&mut *self.rng),
        }
    }

    /// Mood of `utterance`; classifier failures read as neutral.
    pub fn detect_mood(&self, utterance: &str) -> Mood {
        match self.moods.classify_mood(utterance) {
            Ok(mood) => mood,
            Err(e) => {
                tracing::warn!(error = %e, "mood classification failed, assuming neutral");
                Mood::Neutral
            }
        }
    }

    /// Classify the mood once and tell the first joke for it.
    pub fn tell_joke(&mut self, utterance: &str) -> (Mood, String) {
        let mood = self.detect_mood(utterance);
        let joke = self.joke(mood);
        (mood, joke)
    }

    /// "<emoji> <joke>" for a known mood, or the fallback line.
    pub fn joke(&mut self, mood: Mood) -> String {
        let category = mood.joke_category();
        match self.jokes.get_joke(category) {
            Ok(joke) => format!("{} {joke}", mood.emoji()),
            Err(e) => {
                tracing::warn!(error = %e, %category, "joke provider failed");
                JOKE_FALLBACK.to_string()
            }
        }
    }
}
