//! banter CLI: a small conversational bot with a word puzzle.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use banter::config::BanterConfig;
use banter::conversation::{Chatbot, LoopEnd};
use banter::input::{InterruptFlag, stdin_input};
use banter::intent::classify;
use banter::message::{BotMessage, JsonSink, MessageSink, StdoutSink};
use banter::mood::{LexiconMoodClassifier, Mood};
use banter::responder::PUZZLE_INTRO;
use banter::speech::{CommandSpeech, SpeechSink};

#[derive(Parser)]
#[command(name = "banter", version, about = "Terminal chatbot with a word puzzle")]
struct Cli {
    /// Config file (defaults to the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reply and joke selection.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Emit one JSON object per message instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive conversation (default).
    Chat,

    /// Play the word puzzle directly.
    Puzzle,

    /// Print the intent and mood detected for a piece of text.
    Classify {
        /// Text to classify.
        text: String,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set

    let cli = Cli::parse();

    let mut config = BanterConfig::resolve(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let sink: Box<dyn MessageSink> = if cli.json {
        Box::new(JsonSink)
    } else {
        Box::new(StdoutSink::new(config.color && !cli.plain))
    };

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let speech = CommandSpeech::init(&config.speech)
                .map(|s| Box::new(s) as Box<dyn SpeechSink>);
            let mut bot = Chatbot::from_config(&config)?.with_speech(speech);
            let mut input = stdin_input(InterruptFlag::install().into_diagnostic()?);

            let end = bot.run(input.as_mut(), &*sink);
            tracing::info!(?end, turns = bot.transcript().len(), "conversation ended");
            if end == LoopEnd::ReadFailure {
                miette::bail!("giving up after repeated input errors");
            }
        }

        Commands::Puzzle => {
            let bot = Chatbot::from_config(&config)?;
            let mut input = stdin_input(InterruptFlag::install().into_diagnostic()?);
            sink.emit(&BotMessage::reply(&config.bot.name, PUZZLE_INTRO));
            let outcome = bot.puzzle().play(input.as_mut(), &*sink);
            tracing::info!(score = outcome.score, end = ?outcome.end, "puzzle ended");
        }

        Commands::Classify { text } => {
            let intent = classify(&text);
            let classifier = LexiconMoodClassifier;
            let polarity = classifier.polarity(&text);
            let mood = Mood::from_polarity(polarity);
            if cli.json {
                let value = serde_json::json!({
                    "intent": intent,
                    "mood": mood,
                    "polarity": polarity,
                });
                println!("{}", serde_json::to_string(&value).into_diagnostic()?);
            } else {
                println!("intent:   {intent}");
                println!("mood:     {mood} {}", mood.emoji());
                println!("polarity: {polarity:.3}");
            }
        }
    }

    Ok(())
}
