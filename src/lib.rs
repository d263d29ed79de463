// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # banter
//!
//! A rule-based terminal chatbot with a word-puzzle mini-game.
//!
//! ## Architecture
//!
//! - **Intents** (`intent`): ordered pattern table, first match wins
//! - **Replies** (`responder`): canned and randomized replies, mood-aware jokes
//! - **Dialogs** (`dialog`, `puzzle`): small state machines driven one line at a time
//! - **Conversation** (`conversation`): the top-level loop tying it together
//! - **I/O seams** (`input`, `message`, `speech`): swappable for tests
//!
//! ## Library usage
//!
//! ```no_run
//! use banter::config::BanterConfig;
//! use banter::conversation::Chatbot;
//! use banter::input::ScriptedInput;
//! use banter::message::VecSink;
//!
//! let mut bot = Chatbot::from_config(&BanterConfig::default()).unwrap();
//! let sink = VecSink::new();
//! let mut input = ScriptedInput::new(["no", "hello", "bye", "great"]);
//! bot.run(&mut input, &sink);
//! ```

pub mod config;
pub mod conversation;
pub mod dialog;
pub mod error;
pub mod input;
pub mod intent;
pub mod jokes;
pub mod memory;
pub mod message;
pub mod mood;
pub mod puzzle;
pub mod responder;
pub mod speech;
