//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline` to provide async line reading with
//! proper handling of EOF (Ctrl+D) and interrupt (Ctrl+C) signals.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Words that end the chat when typed on their own.
const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a non-blank line (trimmed).
    Message(String),
    /// User submitted a blank line.
    Blank,
    /// `exit`, `quit`, `q`, or Ctrl+D.
    Exit,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

impl InputEvent {
    /// Classify a submitted line.
    pub fn from_line(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            InputEvent::Blank
        } else if EXIT_WORDS.contains(&trimmed.to_lowercase().as_str()) {
            InputEvent::Exit
        } else {
            InputEvent::Message(trimmed.to_string())
        }
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Create a new chat input handler with the given prompt.
    ///
    /// Returns the input handler and a `SharedWriter` that can be used to
    /// print output without interfering with the readline prompt.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    /// Read one line and classify it. Read errors end the chat.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let event = InputEvent::from_line(&line);
                if let InputEvent::Message(text) = &event {
                    let _ = self.rl.add_history_entry(text.clone());
                }
                event
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Exit,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(e) => {
                tracing::debug!("readline error: {e}");
                InputEvent::Exit
            }
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal before the process prints its last lines.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
