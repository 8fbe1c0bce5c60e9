use std::fmt;

use ratatui::prelude::{Direction, Rect};

use super::AUTO_SIZE;
use crate::region::Region;

/// A region arranged by a [`super::Layout`] plus its length along the layout axis.
pub struct Item {
    region: Box<dyn Region>,
    size: u16,
}

impl Item {
    pub(crate) fn new(region: Box<dyn Region>, size: u16) -> Self {
        Self { region, size }
    }

    /// Fixed length along the layout axis, or [`AUTO_SIZE`].
    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn is_auto(&self) -> bool {
        self.size == AUTO_SIZE
    }

    pub(crate) fn set_size(&mut self, size: u16) {
        self.size = size;
    }

    pub fn region(&self) -> &dyn Region {
        self.region.as_ref()
    }

    pub fn region_mut(&mut self) -> &mut dyn Region {
        self.region.as_mut()
    }

    pub fn into_region(self) -> Box<dyn Region> {
        self.region
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("size", &self.size)
            .field("rect", &self.region.rect())
            .finish_non_exhaustive()
    }
}

/// A one-cell line between items `a` and `b = a + 1`.
///
/// Endpoints are inclusive and signed: a layout with no extent on the cross
/// axis yields `end < begin`, a line that contains no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splitter {
    x: [i32; 2],
    y: [i32; 2],
    a: usize,
    b: usize,
}

impl Splitter {
    /// Splitter sitting at axis coordinate `at` and spanning the whole cross
    /// extent of `area`, separating item `a` from item `a + 1`.
    pub fn across(direction: Direction, area: Rect, at: u16, a: usize) -> Self {
        let (x, y) = match direction {
            Direction::Horizontal => (
                [at as i32, at as i32],
                [area.y as i32, area.y as i32 + area.height as i32 - 1],
            ),
            Direction::Vertical => (
                [area.x as i32, area.x as i32 + area.width as i32 - 1],
                [at as i32, at as i32],
            ),
        };
        Self { x, y, a, b: a + 1 }
    }

    pub fn begin(&self) -> (i32, i32) {
        (self.x[0], self.y[0])
    }

    pub fn end(&self) -> (i32, i32) {
        (self.x[1], self.y[1])
    }

    /// Indices of the two items this splitter separates.
    pub fn items(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let (column, row) = (column as i32, row as i32);
        if self.x[0] == self.x[1] {
            // vertical line between side-by-side items
            self.x[0] == column && self.y[0] <= row && row <= self.y[1]
        } else {
            self.y[0] == row && self.x[0] <= column && column <= self.x[1]
        }
    }
}
