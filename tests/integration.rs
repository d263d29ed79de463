//! End-to-end conversation tests.
//!
//! These drive the full loop through scripted input and a collecting sink,
//! with the randomness, clock and joke source pinned so every reply is
//! predictable.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::mock::StepRng;

use banter::config::BanterConfig;
use banter::conversation::{
    Chatbot, FEEDBACK_PROMPT, FEEDBACK_THANKS, GOODBYE, LoopEnd, USER_PROMPT,
};
use banter::dialog::{ANOTHER_JOKE_PROMPT, JOKE_CLOSING, VOICE_PROMPT};
use banter::error::JokeError;
use banter::input::{ScriptStep, ScriptedInput};
use banter::intent::Intent;
use banter::jokes::{JOKE_FALLBACK, JokeCategory, JokeProvider};
use banter::memory::CREATOR_INFO;
use banter::message::{BotMessage, VecSink};
use banter::mood::{FixedMood, LexiconMoodClassifier, Mood, MoodClassifier};
use banter::puzzle::{PuzzleEngine, builtin_levels};
use banter::responder::{MORNING_GREETINGS, PUZZLE_INTRO, Responder};

/// Joke source that records the categories it was asked for.
#[derive(Clone, Default)]
struct RecordingJokes {
    asked: Rc<RefCell<Vec<JokeCategory>>>,
}

impl JokeProvider for RecordingJokes {
    fn get_joke(&mut self, category: JokeCategory) -> Result<String, JokeError> {
        let mut asked = self.asked.borrow_mut();
        asked.push(category);
        Ok(format!("{category} joke #{}", asked.len()))
    }
}

struct OfflineJokes;

impl JokeProvider for OfflineJokes {
    fn get_joke(&mut self, _category: JokeCategory) -> Result<String, JokeError> {
        Err(JokeError::Provider {
            message: "service unreachable".into(),
        })
    }
}

fn chatbot(moods: Box<dyn MoodClassifier>, jokes: Box<dyn JokeProvider>) -> Chatbot {
    let responder = Responder::new(
        "I was created by Otaku Haven.",
        moods,
        jokes,
        Box::new(StepRng::new(0, 0)),
    )
    .with_clock(|| 8);
    Chatbot::new("Chatbot", responder, PuzzleEngine::new(builtin_levels().unwrap()))
}

fn reply_texts(sink: &VecSink) -> Vec<String> {
    sink.messages()
        .into_iter()
        .filter_map(|m| match m {
            BotMessage::Reply { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn greeting_joke_and_exit_without_puzzle() {
    let jokes = RecordingJokes::default();
    let mut bot = chatbot(Box::new(FixedMood(Mood::Neutral)), Box::new(jokes.clone()));
    let sink = VecSink::new();
    let mut input = ScriptedInput::new([
        "no",
        "hello",
        "tell me a joke",
        "no",
        "exit",
        "It was fun",
    ]);

    assert_eq!(bot.run(&mut input, &sink), LoopEnd::Exit);
    assert_eq!(input.remaining(), 0);

    let replies = reply_texts(&sink);
    assert_eq!(replies[0], VOICE_PROMPT);
    assert_eq!(replies[2], format!("Good Morning! {}", MORNING_GREETINGS[0]));
    assert_eq!(replies[3], "😐 all joke #1");
    assert_eq!(replies[4], JOKE_CLOSING);
    assert_eq!(replies[5], FEEDBACK_THANKS);
    assert_eq!(replies[6], "Your feedback: It was fun");
    assert_eq!(replies.len(), 7);

    let texts = sink.texts();
    assert!(texts.contains(&FEEDBACK_PROMPT.to_string()));
    assert!(!texts.iter().any(|t| t.starts_with("Welcome to the WORD PUZZLE")));

    let transcript = bot.transcript();
    assert_eq!(
        transcript.intents(),
        vec![Intent::Greeting, Intent::RequestJoke, Intent::Exit]
    );
    assert_eq!(transcript.feedback(), Some("It was fun"));
    assert_eq!(*jokes.asked.borrow(), vec![JokeCategory::All]);
}

#[test]
fn sad_mood_keeps_its_category_across_follow_ups() {
    let jokes = RecordingJokes::default();
    let mut bot = chatbot(Box::new(LexiconMoodClassifier), Box::new(jokes.clone()));
    let sink = VecSink::new();
    let mut input = ScriptedInput::new(["n", "i am sad, tell me a joke", "Yes", "YES", "no", "bye", ""]);

    bot.run(&mut input, &sink);

    assert_eq!(*jokes.asked.borrow(), vec![JokeCategory::Chuck; 3]);
    let prompts = sink
        .messages()
        .into_iter()
        .filter(|m| *m == BotMessage::prompt(ANOTHER_JOKE_PROMPT))
        .count();
    assert_eq!(prompts, 3);
    let turn = &bot.transcript().turns()[0];
    assert!(turn.replies[0].starts_with(Mood::Sad.emoji()));
}

#[test]
fn follow_up_with_padded_yes_closes() {
    let jokes = RecordingJokes::default();
    let mut bot = chatbot(Box::new(FixedMood(Mood::Happy)), Box::new(jokes.clone()));
    let sink = VecSink::new();
    let mut input = ScriptedInput::new([" yes"]);

    assert_eq!(bot.turn("make me laugh", &mut input, &sink), None);
    assert_eq!(*jokes.asked.borrow(), vec![JokeCategory::Neutral]);
    assert_eq!(reply_texts(&sink).last().map(String::as_str), Some(JOKE_CLOSING));
}

#[test]
fn creator_answer_is_cached_in_memory() {
    let mut bot = chatbot(Box::new(FixedMood(Mood::Neutral)), Box::new(OfflineJokes));
    let sink = VecSink::new();
    let mut input = ScriptedInput::default();

    assert!(bot.memory().get(CREATOR_INFO).is_none());
    bot.turn("who made you?", &mut input, &sink);
    bot.turn("Tell me about your creator", &mut input, &sink);

    assert_eq!(bot.memory().get(CREATOR_INFO), Some("I was created by Otaku Haven."));
    assert_eq!(bot.memory().len(), 1);
    let replies = reply_texts(&sink);
    assert_eq!(replies[0], replies[1]);
}

#[test]
fn failing_joke_source_shows_the_fallback() {
    let mut bot = chatbot(Box::new(FixedMood(Mood::Neutral)), Box::new(OfflineJokes));
    let sink = VecSink::new();
    let mut input = ScriptedInput::new(["no"]);

    bot.turn("joke please", &mut input, &sink);
    assert_eq!(reply_texts(&sink), vec![JOKE_FALLBACK, JOKE_CLOSING]);
}

#[test]
fn puzzle_from_chat_then_resume() {
    let mut bot = chatbot(Box::new(FixedMood(Mood::Neutral)), Box::new(OfflineJokes));
    let sink = VecSink::new();
    let mut input = ScriptedInput::new([
        "no",
        "Play Game",
        "cat",
        "dog",
        "no",
        "ball",
        "Yes",
        "what is your name",
        "quit",
        "",
    ]);

    assert_eq!(bot.run(&mut input, &sink), LoopEnd::Exit);
    let texts = sink.texts();
    assert!(texts.contains(&"Correct! You got 6 points!".to_string()));
    assert!(texts.contains(&"Your total score so far: 16".to_string()));
    assert!(texts.contains(&"The game is over! Your final score is 16 points.".to_string()));
    assert!(!texts.contains(&PUZZLE_INTRO.to_string()));
    assert_eq!(
        bot.transcript().intents(),
        vec![Intent::PlayGame, Intent::AskName, Intent::Exit]
    );
    let game = &bot.transcript().turns()[0];
    assert!(game.replies.is_empty());
    assert_eq!(game.puzzle.as_ref().map(|o| o.score), Some(16));
}

#[test]
fn interrupt_inside_puzzle_returns_to_conversation() {
    let mut bot = chatbot(Box::new(FixedMood(Mood::Neutral)), Box::new(OfflineJokes));
    let sink = VecSink::new();
    let mut input = ScriptedInput::from_steps([
        ScriptStep::Line("no".into()),
        ScriptStep::Line("play game".into()),
        ScriptStep::Interrupt,
        ScriptStep::Line("hi".into()),
        ScriptStep::Line("bye".into()),
        ScriptStep::Line("ok".into()),
    ]);

    assert_eq!(bot.run(&mut input, &sink), LoopEnd::Exit);
    assert!(sink.texts().contains(
        &"You exited the game unexpectedly. Your progress will not be saved.".to_string()
    ));
    assert_eq!(bot.transcript().len(), 3);
}

#[test]
fn end_of_input_says_goodbye() {
    let mut bot = chatbot(Box::new(FixedMood(Mood::Neutral)), Box::new(OfflineJokes));
    let sink = VecSink::new();
    let mut input = ScriptedInput::new(["no", "how are you"]);

    assert_eq!(bot.run(&mut input, &sink), LoopEnd::Closed);
    assert_eq!(reply_texts(&sink).last().map(String::as_str), Some(GOODBYE));
    assert!(bot.transcript().feedback().is_none());
    // One prompt for the voice question, two for the loop.
    let prompts = sink
        .messages()
        .into_iter()
        .filter(|m| *m == BotMessage::prompt(USER_PROMPT))
        .count();
    assert_eq!(prompts, 3);
}

#[test]
fn custom_levels_from_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let levels = dir.path().join("levels.toml");
    std::fs::write(
        &levels,
        r#"
[[level]]
word = "crab"
clues = ["It walks sideways.", "It has claws.", "It lives by the sea.", "Its shell is hard.", "Rust's mascot."]
"#,
    )
    .unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "seed = 7\n\n[bot]\nname = \"Ferris\"\n\n[puzzle]\nlevels_file = {:?}\n",
            levels.display().to_string()
        ),
    )
    .unwrap();

    let config = BanterConfig::resolve(Some(&config_path)).unwrap();
    let bot = Chatbot::from_config(&config).unwrap();
    assert_eq!(bot.puzzle().levels().len(), 1);

    let sink = VecSink::new();
    let mut input = ScriptedInput::new(["a", "b", "c", "d", "crab", "no"]);
    let outcome = bot.puzzle().play(&mut input, &sink);
    assert_eq!(outcome.score, 1);
    assert_eq!(outcome.levels_played, 1);
}

#[test]
fn seeded_bots_reply_identically() {
    let config = BanterConfig {
        seed: Some(42),
        ..Default::default()
    };
    let script = ["no", "asdf", "qwerty", "joke", "no", "hello", "bye", "thanks"];

    let run = || {
        let mut bot = Chatbot::from_config(&config).unwrap();
        let sink = VecSink::new();
        bot.run(&mut ScriptedInput::new(script), &sink);
        sink.texts()
    };
    assert_eq!(run(), run());
}
