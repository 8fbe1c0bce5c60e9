//! ClipRegion: a [`Surface`] wrapper that confines reads and writes to a
//! sub-rectangle of its parent.
//!
//! Regions share one absolute coordinate space, so translating a write into the
//! parent is the identity; the clip only decides whether the write reaches the
//! parent at all. Clips nest: the effective area is always the intersection with
//! the parent's own area, so a child can never escape an ancestor's rectangle.
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::layout::rect_contains;
use crate::surface::Surface;

pub struct ClipRegion<'a> {
    parent: &'a mut dyn Surface,
    rect: Rect,
}

impl<'a> ClipRegion<'a> {
    pub fn new(parent: &'a mut dyn Surface, rect: Rect) -> Self {
        Self { parent, rect }
    }

    /// The rectangle requested at construction, before intersecting with the parent.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        rect_contains(self.area(), x, y)
    }
}

impl Surface for ClipRegion<'_> {
    fn area(&self) -> Rect {
        self.rect.intersection(self.parent.area())
    }

    fn set_content(&mut self, x: u16, y: u16, symbol: &str, style: Style) {
        if self.contains(x, y) {
            self.parent.set_content(x, y, symbol, style);
        }
    }

    fn get_content(&self, x: u16, y: u16) -> Option<(&str, Style)> {
        if self.contains(x, y) {
            self.parent.get_content(x, y)
        } else {
            None
        }
    }
}
