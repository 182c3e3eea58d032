use std::borrow::Cow::{self, Borrowed, Owned};
use std::collections::VecDeque;

use rustyline::Editor;
use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, Helper};

/// Error type for interactive prompts
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Ctrl-C: the user backed out of whatever is currently being asked
    #[error("interrupted")]
    Interrupted,
    /// Ctrl-D or a closed stdin
    #[error("end of input")]
    Eof,
    #[error("could not read input: {0}")]
    Io(String),
}

/// Where the session gets its lines from. The real loop reads a terminal;
/// tests script the answers through [`ScriptedPrompt`].
pub trait Prompt {
    /// Read one line, echoed as typed
    fn line(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Read one line with the input masked (passphrases)
    fn secret(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Replaces typed characters with `*` while masking is on
struct MaskingHighlighter {
    masking: bool,
}

impl Helper for MaskingHighlighter {}

impl Completer for MaskingHighlighter {
    type Candidate = String;
}

impl Hinter for MaskingHighlighter {
    type Hint = String;
}

impl Validator for MaskingHighlighter {}

impl Highlighter for MaskingHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

/// Terminal-backed prompt built on rustyline. Command lines land in the
/// editor history; masked reads do not.
pub struct ReadlinePrompt {
    rl: Editor<MaskingHighlighter, DefaultHistory>,
}

impl ReadlinePrompt {
    pub fn new() -> Result<Self, PromptError> {
        let mut rl = Editor::new().map_err(convert)?;
        rl.set_helper(Some(MaskingHighlighter { masking: false }));
        rl.set_auto_add_history(false);
        Ok(ReadlinePrompt { rl })
    }
}

fn convert(err: ReadlineError) -> PromptError {
    match err {
        ReadlineError::Interrupted => PromptError::Interrupted,
        ReadlineError::Eof => PromptError::Eof,
        other => PromptError::Io(other.to_string()),
    }
}

impl Prompt for ReadlinePrompt {
    fn line(&mut self, prompt: &str) -> Result<String, PromptError> {
        let line = self.rl.readline(prompt).map_err(convert)?;
        if !line.trim().is_empty() {
            let _ = self.rl.add_history_entry(&line);
        }
        Ok(line)
    }

    fn secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        if let Some(helper) = self.rl.helper_mut() {
            helper.masking = true;
        }
        // Masking happens in the highlighter, so it must run even on dumb
        // terminals.
        self.rl.set_color_mode(ColorMode::Forced);
        let result = self.rl.readline(prompt).map_err(convert);
        if let Some(helper) = self.rl.helper_mut() {
            helper.masking = false;
        }
        self.rl.set_color_mode(ColorMode::Enabled);
        result
    }
}

/// Canned prompt answers, consumed front to back; exhaustion reads as end of
/// input, like a closed pipe. Every prompt string shown is recorded so tests
/// can assert which questions were (and were not) asked.
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Every prompt string shown so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn line(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or(PromptError::Eof)
    }

    fn secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.line(prompt)
    }
}
