//! The operator prompt capability.
//!
//! Remediation questions go through [`PromptAsk`] so the validation flow is
//! testable without a terminal; tests inject a [`ScriptedPrompt`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Capability for asking the operator a yes/no question.
pub trait PromptAsk {
    /// Ask a question and report whether the answer was affirmative.
    ///
    /// Only an explicit `yes` (case-insensitive) counts as affirmative;
    /// anything else, including end-of-input, is a decline.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Interactive prompt on stdout/stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    /// Create an interactive prompt.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PromptAsk for StdinPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{question} yes/no ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("yes")
    }
}

/// Scripted responder for tests: answers are popped in order, and every
/// question asked is recorded. Runs out of answers by declining.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that will give the supplied answers in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// The questions asked so far, in order.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.asked
    }

    /// Whether any question was asked.
    #[must_use]
    pub fn was_asked(&self) -> bool {
        !self.asked.is_empty()
    }
}

impl PromptAsk for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}
