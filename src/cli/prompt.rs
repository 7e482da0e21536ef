//! Interactive prompts.

use crate::cli::OutputManager;
use crate::error::{CliError, Result};
use std::io::BufRead;

/// Trait implemented by anything that can answer operator questions
pub trait Prompter {
    /// Ask for free text; an empty answer yields `default`
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question; an empty answer yields `default`
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

/// Reads answers from standard input
#[derive(Debug, Clone)]
pub struct StdinPrompter {
    output: OutputManager,
}

impl StdinPrompter {
    /// Create a prompter writing questions through `output`
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }

    fn read_line(&self) -> Result<String> {
        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::Prompt {
                reason: e.to_string(),
            })?;
        if read == 0 {
            return Err(CliError::Prompt {
                reason: "standard input closed".to_string(),
            }
            .into());
        }
        Ok(line.trim().to_string())
    }
}

impl Prompter for StdinPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let hint = default.map(|d| format!("[{}]", d)).unwrap_or_default();
        self.output.prompt(prompt, &hint)?;
        Ok(resolve_input(&self.read_line()?, default))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        self.output.prompt(prompt, hint)?;
        Ok(resolve_confirm(&self.read_line()?, default))
    }
}

/// Apply the default to a raw text answer
pub fn resolve_input(answer: &str, default: Option<&str>) -> String {
    match (answer.trim(), default) {
        ("", Some(default)) => default.to_string(),
        (answer, _) => answer.to_string(),
    }
}

/// Interpret a raw yes/no answer; anything unrecognised is "no"
pub fn resolve_confirm(answer: &str, default: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}
