use ratatui::layout::Alignment;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::surface::{Surface, print};
use crate::theme::{self, Glyphs};

/// Window chrome: an optional background fill, a one-row title rule and the
/// title text. Everything here is passive state read at draw time.
#[derive(Debug, Clone)]
pub struct BorderedBox {
    background: Color,
    border: bool,
    border_style: Style,
    title: String,
    title_style: Style,
    title_alignment: Alignment,
    glyphs: Glyphs,
    focused: bool,
}

impl Default for BorderedBox {
    fn default() -> Self {
        Self {
            background: theme::background(),
            border: false,
            border_style: Style::default().fg(theme::border()),
            title: String::new(),
            title_style: Style::default().fg(theme::title()),
            title_alignment: Alignment::Center,
            glyphs: Glyphs::default(),
            focused: false,
        }
    }
}

impl BorderedBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn has_border(&self) -> bool {
        self.border
    }

    pub fn set_border(&mut self, show: bool) {
        self.border = show;
    }

    pub fn border_color(&self) -> Color {
        self.border_style.fg.unwrap_or(Color::Reset)
    }

    pub fn set_border_color(&mut self, color: Color) {
        self.border_style = self.border_style.fg(color);
    }

    pub fn border_modifier(&self) -> Modifier {
        self.border_style.add_modifier
    }

    pub fn set_border_modifier(&mut self, modifier: Modifier) {
        self.border_style.add_modifier = modifier;
        self.border_style.sub_modifier = Modifier::empty();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title_color(&self) -> Color {
        self.title_style.fg.unwrap_or(Color::Reset)
    }

    pub fn set_title_color(&mut self, color: Color) {
        self.title_style = self.title_style.fg(color);
    }

    pub fn title_alignment(&self) -> Alignment {
        self.title_alignment
    }

    pub fn set_title_alignment(&mut self, alignment: Alignment) {
        self.title_alignment = alignment;
    }

    pub fn set_glyphs(&mut self, glyphs: Glyphs) {
        self.glyphs = glyphs;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Everything below the title row. The row is reserved with or without a
    /// border so content does not jump when the border is toggled.
    pub fn inner(rect: Rect) -> Rect {
        Rect {
            x: rect.x,
            y: rect.y.saturating_add(1),
            width: rect.width,
            height: rect.height.saturating_sub(1),
        }
    }

    /// Draw the chrome over `rect` and return the interior rectangle.
    pub fn draw(&self, surface: &mut dyn Surface, rect: Rect) -> Rect {
        let fill = theme::fill_style(self.background);
        if self.background != Color::Reset {
            surface.fill_rect(rect, " ", fill);
        }

        if self.border && rect.width >= 2 && rect.height >= 2 {
            let rule = if self.focused {
                self.glyphs.horizontal_focus
            } else {
                self.glyphs.horizontal
            };
            surface.fill_rect(Rect { height: 1, ..rect }, rule, fill.patch(self.border_style));

            if !self.title.is_empty() && rect.width >= 4 {
                let printed = print(
                    surface,
                    &self.title,
                    rect.x + 1,
                    rect.y,
                    rect.width - 2,
                    self.title_alignment,
                    self.title_style,
                );
                if printed > 0 && self.title.chars().count() > printed {
                    // the ellipsis keeps the colour of the glyph it replaces
                    let at = rect.x + rect.width - 2;
                    let fg = surface
                        .get_content(at, rect.y)
                        .and_then(|(_, style)| style.fg)
                        .unwrap_or(Color::Reset);
                    print(
                        surface,
                        self.glyphs.ellipsis,
                        at,
                        rect.y,
                        1,
                        Alignment::Left,
                        Style::default().fg(fg),
                    );
                }
            }
        }

        Self::inner(rect)
    }
}
