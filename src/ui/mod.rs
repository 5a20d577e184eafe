//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Console output
//! - This module - The [Confirm] capability and its implementations

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::Result;

pub mod formatter;

pub use formatter::{
    display_aborted, display_boundary_warning, display_error, display_notes, display_status,
    display_success,
};

/// Yes/no confirmation capability used before outward-facing steps.
pub trait Confirm {
    /// Ask `prompt`; `true` means proceed.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Interprets one line of answer.
///
/// Returns `Some(true)` for "y"/"yes", `Some(false)` for "n"/"no"
/// (case-insensitive, surrounding whitespace ignored) and `None` otherwise.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Line-based confirmation over any reader/writer pair.
///
/// Re-asks until it reads a recognised answer. End of input counts as "no".
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineConfirm { input, output }
    }
}

/// Confirmation from the terminal
pub fn stdin_confirm() -> LineConfirm<io::StdinLock<'static>, io::Stdout> {
    LineConfirm::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            write!(self.output, "{}", formatter::format_prompt(prompt))?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }

            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
        }
    }
}

/// Pre-recorded answers, for tests and non-interactive runs.
///
/// Answers are consumed in order; once exhausted every prompt is declined.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    prompts: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedConfirm {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Every prompt shown so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
