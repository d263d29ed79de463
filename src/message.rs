//! Structured message protocol for bot output.
//!
//! `BotMessage` replaces raw `println!()` calls with typed messages that can be
//! rendered by different sinks: terminal (styled), JSON (streaming), or
//! collected in memory (testing).

use std::io::Write;
use std::sync::Mutex;

use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};

// ── Message types ───────────────────────────────────────────────────────

/// A structured message emitted by the conversation loop or the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BotMessage {
    /// A conversational reply, attributed to the bot.
    Reply { speaker: String, text: String },
    /// Puzzle narration: clues, scores, level results.
    Game { text: String },
    /// A question the next input line answers. Rendered without a newline.
    Prompt { text: String },
    /// Degraded-operation notice (e.g. speech unavailable).
    Warning { text: String },
    /// Error surfaced to the user.
    Error { code: String, message: String },
}

// ── MessageSink trait ───────────────────────────────────────────────────

/// A destination for structured bot messages.
pub trait MessageSink {
    /// Emit a single message.
    fn emit(&self, msg: &BotMessage);

    /// Emit a batch of messages.
    fn emit_batch(&self, msgs: &[BotMessage]) {
        for m in msgs {
            self.emit(m);
        }
    }
}

// ── StdoutSink ──────────────────────────────────────────────────────────

/// Renders messages as terminal output, red for the bot like a chat client.
pub struct StdoutSink {
    color: bool,
}

impl StdoutSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: String) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MessageSink for StdoutSink {
    fn emit(&self, msg: &BotMessage) {
        match msg {
            BotMessage::Reply { speaker, text } => {
                println!("{}", self.paint(format!("{speaker}: {text}")));
            }
            BotMessage::Game { text } => {
                println!("{}", self.paint(text.clone()));
            }
            BotMessage::Prompt { text } => {
                print!("{} ", self.paint(text.clone()));
                std::io::stdout().flush().ok();
            }
            BotMessage::Warning { text } => {
                eprintln!("{}", self.paint(format!("Warning: {text}")));
            }
            BotMessage::Error { code, message } => {
                eprintln!("{}", self.paint(format!("[error:{code}] {message}")));
            }
        }
    }
}

// ── JsonSink ────────────────────────────────────────────────────────────

/// Emits messages as newline-delimited JSON (for piping into other tools).
pub struct JsonSink;

impl MessageSink for JsonSink {
    fn emit(&self, msg: &BotMessage) {
        if let Ok(json) = serde_json::to_string(msg) {
            println!("{json}");
        }
    }
}

// ── VecSink ─────────────────────────────────────────────────────────────

/// Collects messages into a `Vec<BotMessage>` for testing.
pub struct VecSink {
    messages: Mutex<Vec<BotMessage>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected messages.
    pub fn messages(&self) -> Vec<BotMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Text of every collected message, in order.
    pub fn texts(&self) -> Vec<String> {
        self.messages().iter().map(|m| m.text().to_string()).collect()
    }

    /// Number of collected messages.
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for VecSink {
    fn emit(&self, msg: &BotMessage) {
        self.messages.lock().unwrap().push(msg.clone());
    }
}

// ── Convenience constructors ────────────────────────────────────────────

impl BotMessage {
    pub fn reply(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Reply {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    pub fn game(text: impl Into<String>) -> Self {
        Self::Game { text: text.into() }
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self::Prompt { text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::Warning { text: text.into() }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The human-readable text carried by the message.
    pub fn text(&self) -> &str {
        match self {
            Self::Reply { text, .. }
            | Self::Game { text }
            | Self::Prompt { text }
            | Self::Warning { text } => text,
            Self::Error { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_messages() {
        let sink = VecSink::new();
        sink.emit(&BotMessage::reply("Chatbot", "hello"));
        sink.emit(&BotMessage::game("Clue 1: it barks"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.texts(), vec!["hello", "Clue 1: it barks"]);
    }

    #[test]
    fn message_serializes_to_json() {
        let msg = BotMessage::reply("Chatbot", "I was created by Otaku Haven.");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"Reply\""));
        assert!(json.contains("\"speaker\":\"Chatbot\""));
    }

    #[test]
    fn message_deserializes_from_json() {
        let json = r#"{"type":"Prompt","text":"You:"}"#;
        let msg: BotMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg, BotMessage::prompt("You:"));
    }

    #[test]
    fn batch_emit() {
        let sink = VecSink::new();
        sink.emit_batch(&[
            BotMessage::game("one"),
            BotMessage::warning("two"),
            BotMessage::error("banter::test", "three"),
        ]);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.messages()[2].text(), "three");
    }
}
