use ratatui::style::{Color, Style};

// Centralized defaults. Layouts and windows copy these at construction and
// every value can be overridden per instance afterwards.

/// Line glyphs used for separators, title rules and truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub horizontal: &'static str,
    pub horizontal_focus: &'static str,
    pub vertical: &'static str,
    pub vertical_focus: &'static str,
    pub ellipsis: &'static str,
}

pub const DEFAULT_GLYPHS: Glyphs = Glyphs {
    horizontal: "─",
    horizontal_focus: "═",
    vertical: "│",
    vertical_focus: "║",
    ellipsis: "…",
};

pub const ASCII_GLYPHS: Glyphs = Glyphs {
    horizontal: "-",
    horizontal_focus: "=",
    vertical: "|",
    vertical_focus: "#",
    ellipsis: "~",
};

impl Default for Glyphs {
    fn default() -> Self {
        DEFAULT_GLYPHS
    }
}

/// `Color::Reset` means "leave the terminal background alone": no pre-fill.
pub fn background() -> Color {
    Color::Reset
}

pub fn border() -> Color {
    Color::White
}

pub fn title() -> Color {
    Color::White
}

pub fn button() -> Color {
    Color::Yellow
}

pub fn separator_style() -> Style {
    Style::default().fg(border())
}

pub fn fill_style(bg: Color) -> Style {
    Style::default().bg(bg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_glyphs_distinguish_focus() {
        let g = Glyphs::default();
        assert_ne!(g.horizontal, g.horizontal_focus);
        assert_ne!(g.vertical, g.vertical_focus);
    }

    #[test]
    fn default_background_does_not_fill() {
        assert_eq!(background(), Color::Reset);
    }
}
