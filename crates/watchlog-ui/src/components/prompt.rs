use std::path::PathBuf;

use crate::themes::Theme;
use ratatui::text::{Line, Span};

use watchlog_core::paths::expand_home;

/// Single-line input for choosing a file to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPrompt {
    input: String,
}

impl PathPrompt {
    /// Open the prompt pre-filled with `initial`, usually the current source.
    pub fn with_input(initial: impl Into<String>) -> Self {
        Self {
            input: initial.into(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// The path entered so far with `~` expanded, or `None` if blank.
    pub fn submit(&self) -> Option<PathBuf> {
        if self.input.trim().is_empty() {
            None
        } else {
            Some(expand_home(&self.input))
        }
    }

    pub fn to_line<'a>(&self, theme: &'a Theme) -> Line<'a> {
        Line::from(vec![
            Span::styled("Open CSV: ", theme.label),
            Span::styled(self.input.clone(), theme.prompt),
            Span::styled(" ", theme.prompt_cursor),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
