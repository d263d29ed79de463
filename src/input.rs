//! Line-oriented input sources.
//!
//! The conversation loop and the puzzle block on `InputSource::read_line`, the
//! only suspension point in the program. Both real readers report Ctrl-C as
//! [`InputError::Interrupted`] without waiting for Enter: `TerminalInput` reads
//! key events on a TTY, `StdinInput` reads piped input. `ScriptedInput` replays
//! a fixed script for tests.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::tty::IsTty;

use crate::error::{InputError, InputResult};

/// A source of user utterances, one line per call.
pub trait InputSource {
    /// Read the next line without its line terminator.
    fn read_line(&mut self) -> InputResult<String>;
}

/// Strip a trailing `\n` or `\r\n`, leaving other whitespace intact.
fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

// ── Interrupt flag ──────────────────────────────────────────────────────

/// SIGINT latch shared with the signal handler.
///
/// A SIGINT sets the flag and the blocked reader consumes it within one poll
/// interval. A second SIGINT while the flag is still set terminates the process
/// with the default action.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Register SIGINT handlers that drive this flag.
    pub fn install() -> std::io::Result<Self> {
        let flag = Self::default();
        #[cfg(unix)]
        {
            use signal_hook::consts::SIGINT;
            // Order matters: the conditional default must see the flag before it is set.
            signal_hook::flag::register_conditional_default(SIGINT, Arc::clone(&flag.raised))?;
            signal_hook::flag::register(SIGINT, Arc::clone(&flag.raised))?;
        }
        Ok(flag)
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Consume a pending interrupt.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}

// ── StdinInput ──────────────────────────────────────────────────────────

/// How often a blocked read checks for a pending interrupt.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// Line reader over piped (non-terminal) input.
///
/// Lines are read on a helper thread and handed over a channel, so a pending
/// interrupt is reported while the read is still blocked. A line that arrives
/// after the interrupt stays queued for the next call.
pub struct StdinInput {
    interrupt: InterruptFlag,
    lines: Receiver<InputResult<String>>,
}

impl StdinInput {
    /// Read the process's standard input.
    pub fn new(interrupt: InterruptFlag) -> Self {
        Self::from_reader(BufReader::new(std::io::stdin()), interrupt)
    }

    /// Read lines from any buffered source.
    pub fn from_reader<R>(reader: R, interrupt: InterruptFlag) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, lines) = mpsc::channel();
        thread::spawn(move || pump_lines(reader, tx));
        Self { interrupt, lines }
    }
}

fn pump_lines<R: BufRead>(mut reader: R, tx: Sender<InputResult<String>>) {
    loop {
        let mut line = String::new();
        let (item, last) = match reader.read_line(&mut line) {
            Ok(0) => (Err(InputError::Closed), true),
            Ok(_) => (Ok(strip_terminator(line)), false),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => (Err(InputError::Io { source }), true),
        };
        if tx.send(item).is_err() || last {
            return;
        }
    }
}

impl InputSource for StdinInput {
    fn read_line(&mut self) -> InputResult<String> {
        loop {
            if self.interrupt.take() {
                return Err(InputError::Interrupted);
            }
            match self.lines.recv_timeout(INTERRUPT_POLL) {
                Ok(item) => return item,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(InputError::Closed),
            }
        }
    }
}

// ── TerminalInput ───────────────────────────────────────────────────────

/// What one key press did to the line being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    /// Keep reading; write `echo` to the terminal.
    Echo(String),
    Submit(String),
    Interrupt,
    Close,
}

/// Minimal line editor driven by key events.
#[derive(Debug, Default)]
pub struct LineEditor {
    line: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> EditStep {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Char('c') if ctrl => EditStep::Interrupt,
            KeyCode::Char('d') if ctrl && self.line.is_empty() => EditStep::Close,
            KeyCode::Char(_) if ctrl => EditStep::Echo(String::new()),
            KeyCode::Char(c) => {
                self.line.push(c);
                EditStep::Echo(c.to_string())
            }
            KeyCode::Backspace => match self.line.pop() {
                Some(_) => EditStep::Echo("\x08 \x08".into()),
                None => EditStep::Echo(String::new()),
            },
            KeyCode::Enter => EditStep::Submit(std::mem::take(&mut self.line)),
            _ => EditStep::Echo(String::new()),
        }
    }
}

/// Raw mode for the lifetime of one read.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        terminal::disable_raw_mode().ok();
    }
}

/// Interactive terminal reader. Ctrl-C arrives as a key event and ends the
/// read at once; a SIGINT from elsewhere is seen on the next poll.
pub struct TerminalInput {
    interrupt: InterruptFlag,
}

impl TerminalInput {
    pub fn new(interrupt: InterruptFlag) -> Self {
        Self { interrupt }
    }

    fn read_raw(&mut self) -> std::io::Result<InputResult<String>> {
        let _raw = RawMode::enable()?;
        let mut out = std::io::stdout();
        let mut editor = LineEditor::new();
        loop {
            if self.interrupt.take() {
                write!(out, "\r\n")?;
                return Ok(Err(InputError::Interrupted));
            }
            if !event::poll(INTERRUPT_POLL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match editor.handle_key(key.code, key.modifiers) {
                EditStep::Echo(text) => write!(out, "{text}")?,
                EditStep::Submit(line) => {
                    write!(out, "\r\n")?;
                    out.flush()?;
                    return Ok(Ok(line));
                }
                EditStep::Interrupt => {
                    write!(out, "^C\r\n")?;
                    out.flush()?;
                    return Ok(Err(InputError::Interrupted));
                }
                EditStep::Close => {
                    write!(out, "\r\n")?;
                    out.flush()?;
                    return Ok(Err(InputError::Closed));
                }
            }
            out.flush()?;
        }
    }
}

impl InputSource for TerminalInput {
    fn read_line(&mut self) -> InputResult<String> {
        if self.interrupt.take() {
            return Err(InputError::Interrupted);
        }
        self.read_raw().unwrap_or_else(|source| Err(InputError::Io { source }))
    }
}

/// Terminal reader when stdin is a TTY, piped reader otherwise.
pub fn stdin_input(interrupt: InterruptFlag) -> Box<dyn InputSource> {
    if std::io::stdin().is_tty() {
        Box::new(TerminalInput::new(interrupt))
    } else {
        Box::new(StdinInput::new(interrupt))
    }
}

// ── ScriptedInput ───────────────────────────────────────────────────────

/// One scripted event.
#[derive(Debug)]
pub enum ScriptStep {
    Line(String),
    Interrupt,
    Fail(String),
}

/// Replays a fixed sequence of lines and failures; reports `Closed` once
/// exhausted.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
    consumed: usize,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: lines.into_iter().map(|l| ScriptStep::Line(l.into())).collect(),
            consumed: 0,
        }
    }

    pub fn from_steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Lines not yet read.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Lines read so far, including failed reads.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl InputSource for ScriptedInput {
    fn read_line(&mut self) -> InputResult<String> {
        let step = self.steps.pop_front().ok_or(InputError::Closed)?;
        self.consumed += 1;
        match step {
            ScriptStep::Line(line) => Ok(line),
            ScriptStep::Interrupt => Err(InputError::Interrupted),
            ScriptStep::Fail(message) => Err(InputError::Io {
                source: std::io::Error::new(std::io::ErrorKind::Other, message),
            }),
        }
    }
}
