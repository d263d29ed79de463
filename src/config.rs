//! Runtime configuration for banter.
//!
//! Configuration is read from TOML, by default at
//! `$XDG_CONFIG_HOME/banter/config.toml`. Every key has a default, so an empty
//! or missing default file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanterConfig {
    /// Seed for the reply randomness. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Colored terminal output.
    #[serde(default = "default_color")]
    pub color: bool,
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub puzzle: PuzzleConfig,
}

/// Identity of the bot itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Speaker label shown before every reply.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Answer given to creator questions; cached in memory on first use.
    #[serde(default = "default_creator")]
    pub creator: String,
}

/// External text-to-speech program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Program that speaks its final argument aloud.
    #[serde(default = "default_speech_program")]
    pub program: String,
    /// Speech rate in words per minute.
    #[serde(default = "default_speech_rate")]
    pub rate: u32,
    /// Extra arguments passed before the text.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// TOML file with `[[level]]` tables replacing the built-in levels.
    #[serde(default)]
    pub levels_file: Option<PathBuf>,
}

fn default_color() -> bool {
    true
}
fn default_log_filter() -> String {
    "warn".into()
}
fn default_bot_name() -> String {
    "Chatbot".into()
}
fn default_creator() -> String {
    "I was created by Otaku Haven.".into()
}
fn default_speech_program() -> String {
    "espeak".into()
}
fn default_speech_rate() -> u32 {
    200
}

impl Default for BanterConfig {
    fn default() -> Self {
        Self {
            seed: None,
            color: default_color(),
            log_filter: default_log_filter(),
            bot: BotConfig::default(),
            speech: SpeechConfig::default(),
            puzzle: PuzzleConfig::default(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            creator: default_creator(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: default_speech_program(),
            rate: default_speech_rate(),
            extra_args: Vec::new(),
        }
    }
}

impl BanterConfig {
    /// `$XDG_CONFIG_HOME/banter/config.toml`, falling back to `~/.config`.
    pub fn default_path() -> ConfigResult<PathBuf> {
        let base = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .map_err(|_| ConfigError::NoHome)?,
        };
        Ok(base.join("banter").join("config.toml"))
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Resolve the effective config: an explicit path must exist, the default
    /// path may be absent.
    pub fn resolve(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(ConfigError::NoHome) => return Ok(Self::default()),
            Err(e) => return Err(e),
        };
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn from_toml(content: &str, path: &Path) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}
