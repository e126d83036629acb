//! Terminal markdown rendering for agent replies.

use termimad::MadSkin;
use termimad::crossterm::style::Color;

/// Renders agent replies through `termimad`.
pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render a complete markdown reply, indented to match the rest of the UI.
    pub fn render(&self, markdown: &str) -> String {
        let rendered = self.skin.term_text(markdown).to_string();
        rendered
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
