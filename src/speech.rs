//! Optional text-to-speech output.
//!
//! Speech is an external collaborator: `CommandSpeech` hands each reply to a
//! TTS program such as `espeak`. If the program cannot be started the caller
//! falls back to text-only output.

use std::cell::RefCell;
use std::process::{Command, Stdio};
use std::rc::Rc;

use crate::config::SpeechConfig;

/// Receives every reply when voice mode is enabled.
pub trait SpeechSink {
    /// Speak `text`, blocking until done. Failures are reported, not raised.
    fn speak(&mut self, text: &str) -> Result<(), String>;
}

/// Speaks by running an external program once per utterance.
#[derive(Debug, Clone)]
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
}

impl CommandSpeech {
    /// Probe the configured program. Returns `None` when it cannot be run.
    pub fn init(config: &SpeechConfig) -> Option<Self> {
        let probe = Command::new(&config.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match probe {
            Ok(_) => {
                let mut args = vec!["-s".to_string(), config.rate.to_string()];
                args.extend(config.extra_args.iter().cloned());
                Some(Self {
                    program: config.program.clone(),
                    args,
                })
            }
            Err(e) => {
                tracing::warn!(program = %config.program, error = %e, "speech program unavailable");
                None
            }
        }
    }
}

impl SpeechSink for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<(), String> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| e.to_string())?;
        if status.success() {
            Ok(())
        } else {
            Err(format!("{} exited with {status}", self.program))
        }
    }
}

/// Records what would have been spoken instead of making a sound.
///
/// Clones share one log, so a caller can keep a handle after giving the sink
/// away.
#[derive(Debug, Clone, Default)]
pub struct SilentSpeech {
    spoken: Rc<RefCell<Vec<String>>>,
}

impl SilentSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }
}

impl SpeechSink for SilentSpeech {
    fn speak(&mut self, text: &str) -> Result<(), String> {
        self.spoken.borrow_mut().push(text.to_string());
        Ok(())
    }
}
