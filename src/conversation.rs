//! The top-level conversation loop.
//!
//! `Chatbot` reads one utterance per turn, classifies it, and either answers
//! through the [`Responder`], hands control to the puzzle, or runs the exit
//! dialog. Every turn is recorded in an in-process [`Transcript`]; nothing is
//! persisted.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::BanterConfig;
use crate::dialog::{
    ANOTHER_JOKE_PROMPT, FollowUpStep, JOKE_CLOSING, JokeFollowUp, VOICE_OFF_REPLY,
    VOICE_ON_REPLY, VOICE_PROMPT, VOICE_REPROMPT, VoicePrompt, VoiceStep,
};
use crate::error::{BanterResult, InputError};
use crate::input::InputSource;
use crate::intent::{Intent, classify};
use crate::jokes::BuiltinJokes;
use crate::memory::MemoryStore;
use crate::message::{BotMessage, MessageSink};
use crate::mood::LexiconMoodClassifier;
use crate::puzzle::{PuzzleEngine, PuzzleOutcome, builtin_levels, load_levels};
use crate::responder::Responder;
use crate::speech::SpeechSink;

pub const USER_PROMPT: &str = "You:";
pub const FEEDBACK_PROMPT: &str =
    "Before you go, I would love your feedback! How was your experience?";
pub const FEEDBACK_THANKS: &str =
    "Thank you for your feedback! We appreciate it. Have a great day!";
pub const FEEDBACK_SPOKEN: &str = "Thank you for your feedback! Have a great day!";
pub const VOICE_UNAVAILABLE: &str = "Unable to initialize voice. Text-to-speech will not work.";
pub const GOODBYE: &str = "Goodbye!";

/// Consecutive failed reads tolerated before the loop gives up.
const MAX_READ_ERRORS: usize = 3;

// ── Transcript ──────────────────────────────────────────────────────────

/// One user utterance and everything said in response.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    pub utterance: String,
    pub intent: Intent,
    /// Replies shown to the user, in order. Puzzle narration is not included.
    pub replies: Vec<String>,
    /// Set when the turn started a puzzle session.
    pub puzzle: Option<PuzzleOutcome>,
}

/// In-memory record of a conversation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
    feedback: Option<String>,
}

impl Transcript {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Feedback given at exit, if the user got that far.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Intents in turn order.
    pub fn intents(&self) -> Vec<Intent> {
        self.turns.iter().map(|t| t.intent).collect()
    }
}

// ── Chatbot ─────────────────────────────────────────────────────────────

/// Why the conversation loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEnd {
    /// An exit intent ran the feedback dialog.
    Exit,
    /// Ctrl-C at the conversation level.
    Interrupted,
    /// Input ran out.
    Closed,
    /// Reading kept failing.
    ReadFailure,
}

pub struct Chatbot {
    name: String,
    responder: Responder,
    memory: MemoryStore,
    puzzle: PuzzleEngine,
    speech: Option<Box<dyn SpeechSink>>,
    voice: bool,
    transcript: Transcript,
    replies: Vec<String>,
}

impl Chatbot {
    pub fn new(name: impl Into<String>, responder: Responder, puzzle: PuzzleEngine) -> Self {
        Self {
            name: name.into(),
            responder,
            memory: MemoryStore::new(),
            puzzle,
            speech: None,
            voice: false,
            transcript: Transcript::default(),
            replies: Vec::new(),
        }
    }

    /// Build from configuration with the default collaborators.
    pub fn from_config(config: &BanterConfig) -> BanterResult<Self> {
        let levels = match &config.puzzle.levels_file {
            Some(path) => load_levels(path)?,
            None => builtin_levels()?,
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // Offset so replies and jokes do not share one stream.
        let jokes = BuiltinJokes::new(config.seed.map(|s| s.wrapping_add(1)));
        let responder = Responder::new(
            config.bot.creator.clone(),
            Box::new(LexiconMoodClassifier),
            Box::new(jokes),
            Box::new(rng),
        );
        Ok(Self::new(config.bot.name.clone(), responder, PuzzleEngine::new(levels)))
    }

    /// Attach a speech collaborator. Without one, voice mode degrades to text.
    pub fn with_speech(mut self, speech: Option<Box<dyn SpeechSink>>) -> Self {
        self.speech = speech;
        self
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice
    }

    pub fn puzzle(&self) -> &PuzzleEngine {
        &self.puzzle
    }

    /// Voice prompt, then the conversation loop until exit or end of input.
    pub fn run(&mut self, input: &mut dyn InputSource, sink: &dyn MessageSink) -> LoopEnd {
        if let Err(e) = self.ask_voice(input, sink) {
            return self.stop(e, sink);
        }

        let mut read_errors = 0;
        loop {
            sink.emit(&BotMessage::prompt(USER_PROMPT));
            let line = match input.read_line() {
                Ok(line) => {
                    read_errors = 0;
                    line
                }
                Err(e) if e.ends_session() => return self.stop(e, sink),
                Err(e) => {
                    read_errors += 1;
                    tracing::warn!(error = %e, read_errors, "failed to read utterance");
                    sink.emit(&BotMessage::error("banter::input::io", e.to_string()));
                    if read_errors >= MAX_READ_ERRORS {
                        return LoopEnd::ReadFailure;
                    }
                    continue;
                }
            };
            if let Some(end) = self.turn(&line, input, sink) {
                return end;
            }
        }
    }

    /// Handle one utterance. `Some` ends the loop.
    pub fn turn(
        &mut self,
        utterance: &str,
        input: &mut dyn InputSource,
        sink: &dyn MessageSink,
    ) -> Option<LoopEnd> {
        let intent = classify(utterance);
        tracing::debug!(%intent, "classified utterance");

        let mut puzzle = None;
        let end = match intent {
            Intent::Exit => Some(self.farewell(input, sink)),
            Intent::PlayGame => {
                let outcome = self.puzzle.play(input, sink);
                tracing::info!(score = outcome.score, end = ?outcome.end, "puzzle session over");
                puzzle = Some(outcome);
                None
            }
            Intent::RequestJoke => self.jokes(utterance, input, sink),
            _ => {
                let reply = self.responder.respond(intent, utterance, &mut self.memory);
                self.say(&reply, sink);
                None
            }
        };

        self.transcript.turns.push(Turn {
            utterance: utterance.to_string(),
            intent,
            replies: std::mem::take(&mut self.replies),
            puzzle,
        });
        end
    }

    fn ask_voice(&mut self, input: &mut dyn InputSource, sink: &dyn MessageSink) -> Result<(), InputError> {
        self.reply(VOICE_PROMPT, sink);
        let mut prompt = VoicePrompt::new();
        loop {
            sink.emit(&BotMessage::prompt(USER_PROMPT));
            match prompt.step(&input.read_line()?) {
                VoiceStep::Reprompt => self.reply(VOICE_REPROMPT, sink),
                VoiceStep::Decided { voice: true } if self.speech.is_none() => {
                    sink.emit(&BotMessage::warning(VOICE_UNAVAILABLE));
                    self.reply(VOICE_OFF_REPLY, sink);
                    break;
                }
                VoiceStep::Decided { voice } => {
                    self.voice = voice;
                    if voice {
                        self.say(VOICE_ON_REPLY, sink);
                    } else {
                        self.reply(VOICE_OFF_REPLY, sink);
                    }
                    break;
                }
            }
        }
        self.replies.clear();
        Ok(())
    }

    fn jokes(
        &mut self,
        utterance: &str,
        input: &mut dyn InputSource,
        sink: &dyn MessageSink,
    ) -> Option<LoopEnd> {
        let (mood, joke) = self.responder.tell_joke(utterance);
        self.say(&joke, sink);

        let mut follow_up = JokeFollowUp::new(mood);
        loop {
            sink.emit(&BotMessage::prompt(ANOTHER_JOKE_PROMPT));
            let answer = match input.read_line() {
                Ok(answer) => answer,
                Err(e) if e.ends_session() => return Some(self.stop(e, sink)),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read joke follow-up");
                    String::new()
                }
            };
            match follow_up.step(&answer) {
                FollowUpStep::AnotherJoke => {
                    let joke = self.responder.joke(follow_up.mood());
                    self.say(&joke, sink);
                }
                FollowUpStep::Closed => {
                    self.say(JOKE_CLOSING, sink);
                    return None;
                }
            }
        }
    }

    fn farewell(&mut self, input: &mut dyn InputSource, sink: &dyn MessageSink) -> LoopEnd {
        sink.emit(&BotMessage::prompt(FEEDBACK_PROMPT));
        let feedback = input.read_line().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "no feedback given");
            String::new()
        });
        self.reply(FEEDBACK_THANKS, sink);
        self.reply(&format!("Your feedback: {feedback}"), sink);
        self.speak(FEEDBACK_SPOKEN);
        self.transcript.feedback = Some(feedback);
        LoopEnd::Exit
    }

    fn stop(&mut self, e: InputError, sink: &dyn MessageSink) -> LoopEnd {
        tracing::debug!(error = %e, "conversation input ended");
        self.reply(GOODBYE, sink);
        match e {
            InputError::Interrupted => LoopEnd::Interrupted,
            _ => LoopEnd::Closed,
        }
    }

    /// Show and, in voice mode, speak a reply.
    fn say(&mut self, text: &str, sink: &dyn MessageSink) {
        self.reply(text, sink);
        self.speak(text);
    }

    /// Show a reply without speaking it.
    fn reply(&mut self, text: &str, sink: &dyn MessageSink) {
        sink.emit(&BotMessage::reply(&self.name, text));
        self.replies.push(text.to_string());
    }

    fn speak(&mut self, text: &str) {
        if !self.voice {
            return;
        }
        if let Some(speech) = self.speech.as_mut() {
            if let Err(e) = speech.speak(text) {
                tracing::warn!(error = %e, "speech failed");
            }
        }
    }
}
