//! Drawing surfaces.
//!
//! Everything in this crate draws through the [`Surface`] trait instead of a
//! concrete backend. A ratatui [`Buffer`] is a surface, so the buffer behind a
//! `ratatui::Frame` can be handed straight to a layout or manager. Wrappers such
//! as [`crate::clip::ClipRegion`] implement the same trait, which is what makes
//! nested composition work.
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;

/// A grid of styled cells addressed in absolute terminal coordinates.
pub trait Surface {
    /// The cells this surface accepts writes for.
    fn area(&self) -> Rect;

    /// Replace the cell at `(x, y)`. Writes outside [`Surface::area`] are dropped.
    fn set_content(&mut self, x: u16, y: u16, symbol: &str, style: Style);

    /// Read back a previously drawn cell, `None` outside [`Surface::area`].
    fn get_content(&self, x: u16, y: u16) -> Option<(&str, Style)>;

    /// Fill every cell of `rect` that lies on this surface.
    fn fill_rect(&mut self, rect: Rect, symbol: &str, style: Style) {
        let rect = rect.intersection(self.area());
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                self.set_content(x, y, symbol, style);
            }
        }
    }
}

impl Surface for Buffer {
    fn area(&self) -> Rect {
        self.area
    }

    fn set_content(&mut self, x: u16, y: u16, symbol: &str, style: Style) {
        if let Some(cell) = self.cell_mut((x, y)) {
            cell.reset();
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }

    fn get_content(&self, x: u16, y: u16) -> Option<(&str, Style)> {
        self.cell((x, y)).map(|cell| (cell.symbol(), cell.style()))
    }
}

/// Print `text` on row `y` inside the span `x..x + max_width`.
///
/// The style is patched over whatever the target cells already carry, so a
/// background painted earlier survives underneath the glyphs. Text wider than
/// the span is cut at the end. Returns the number of characters printed.
pub fn print(
    surface: &mut dyn Surface,
    text: &str,
    x: u16,
    y: u16,
    max_width: u16,
    align: Alignment,
    style: Style,
) -> usize {
    if max_width == 0 {
        return 0;
    }
    let len = text.chars().count();
    let shown = len.min(max_width as usize);
    let slack = max_width as usize - shown;
    let start = match align {
        Alignment::Left => 0,
        Alignment::Center => slack / 2,
        Alignment::Right => slack,
    };
    let mut printed = 0;
    let mut buf = [0u8; 4];
    for (idx, ch) in text.chars().take(shown).enumerate() {
        let Some(col) = x.checked_add((start + idx) as u16) else {
            break;
        };
        let existing = surface
            .get_content(col, y)
            .map(|(_, style)| style)
            .unwrap_or_default();
        surface.set_content(col, y, ch.encode_utf8(&mut buf), existing.patch(style));
        printed += 1;
    }
    printed
}
