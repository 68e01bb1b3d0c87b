//! Modal text entry.
//!
//! The navigator asks a [`Prompt`] for the label of an annotated region.
//! [`TerminalPrompt`] reads it from the terminal the program was started
//! from; the window does not process input while it waits.

use std::io::{self, BufRead, Write};

use crate::error::FrameGrabError;

/// A blocking text-entry dialog.
pub trait Prompt {
    /// Ask for one line of text. `None` means the user cancelled.
    fn prompt_text(&mut self, message: &str) -> Result<Option<String>, FrameGrabError>;
}

/// Reads a line from any [`BufRead`] after writing the message to a
/// [`Write`]r. Defaults to stdin/stdout.
pub struct TerminalPrompt<R = io::StdinLock<'static>, W = io::Stdout> {
    input: R,
    output: W,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn with_streams(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn prompt_text(&mut self, message: &str) -> Result<Option<String>, FrameGrabError> {
        write!(self.output, "{message} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        // Only the line terminator is removed; surrounding spaces are kept.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}
