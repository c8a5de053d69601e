//! Terminal markdown rendering for assistant turns.
//!
//! Replies from the model often carry light markdown (bold, lists); they are
//! rendered through `termimad` once the whole reply is in.

use termimad::crossterm::style::Color;
use termimad::MadSkin;

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render a complete markdown reply into an ANSI-styled string.
    pub fn render(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_plain_text() {
        let renderer = ChatRenderer::new();
        let out = renderer.render("We offer automation.");
        assert!(out.contains("We offer automation."));
    }

    #[test]
    fn test_render_strips_bold_markers() {
        let renderer = ChatRenderer::new();
        let out = renderer.render("**Marketing** and more");
        assert!(out.contains("Marketing"));
        assert!(!out.contains("**"));
    }
}
