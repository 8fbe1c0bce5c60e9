pub mod item;
pub mod linear;

pub use item::{Item, Splitter};
pub use linear::{InputCapture, Layout, MouseCapture};

use ratatui::prelude::{Direction, Rect};

/// Item size meaning "share the remaining space with the other auto items".
pub const AUTO_SIZE: u16 = 0;

/// Smallest length a splitter drag may leave on either neighbour. Keeping it
/// above [`AUTO_SIZE`] guarantees a dragged item stays fixed-size.
pub const MIN_ITEM_LENGTH: u16 = 1;

/// One separator cell between each pair of adjacent items, drawn or not.
pub fn separator_count(items: usize) -> u16 {
    items.saturating_sub(1).min(u16::MAX as usize) as u16
}

/// Length handed to every auto-sized item.
///
/// Integer division: the remainder stays unused. Over-constrained layouts
/// clamp to zero instead of going negative.
pub fn auto_size(space: u16, fixed: u32, auto: usize, separators: u16) -> u16 {
    if auto == 0 {
        return 0;
    }
    let free = space as i64 - fixed as i64 - separators as i64;
    if free <= 0 {
        return 0;
    }
    (free / auto as i64) as u16
}

pub fn axis_length(direction: Direction, area: Rect) -> u16 {
    match direction {
        Direction::Horizontal => area.width,
        Direction::Vertical => area.height,
    }
}

/// Placement of a run of items along one axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plan {
    pub auto_size: u16,
    /// One rectangle per item, in order.
    pub rects: Vec<Rect>,
    /// Axis coordinate of the separator cell after each item but the last.
    pub separators: Vec<u16>,
}

impl Plan {
    /// Cells along the axis taken by items and separators.
    pub fn consumed(&self, direction: Direction) -> u32 {
        let items: u32 = self
            .rects
            .iter()
            .map(|rect| axis_length(direction, *rect) as u32)
            .sum();
        items + self.separators.len() as u32
    }
}

/// Walk `sizes` in order and place each item, advancing a cursor by the item
/// length and then by one separator cell. Draw and hit-testing both use this
/// walk, so drawn separators and draggable splitters always coincide.
pub fn plan(direction: Direction, area: Rect, sizes: &[u16]) -> Plan {
    let auto = sizes.iter().filter(|size| **size == AUTO_SIZE).count();
    let fixed: u32 = sizes.iter().map(|size| *size as u32).sum();
    let auto_size = auto_size(
        axis_length(direction, area),
        fixed,
        auto,
        separator_count(sizes.len()),
    );

    let mut rects = Vec::with_capacity(sizes.len());
    let mut separators = Vec::with_capacity(sizes.len().saturating_sub(1));
    let mut cursor = match direction {
        Direction::Horizontal => area.x,
        Direction::Vertical => area.y,
    };
    for (idx, size) in sizes.iter().enumerate() {
        let length = if *size == AUTO_SIZE { auto_size } else { *size };
        let rect = match direction {
            Direction::Horizontal => Rect {
                x: cursor,
                y: area.y,
                width: length,
                height: area.height,
            },
            Direction::Vertical => Rect {
                x: area.x,
                y: cursor,
                width: area.width,
                height: length,
            },
        };
        rects.push(rect);
        cursor = cursor.saturating_add(length);
        if idx + 1 < sizes.len() {
            separators.push(cursor);
            cursor = cursor.saturating_add(1);
        }
    }
    Plan {
        auto_size,
        rects,
        separators,
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::prelude::Rect;

    #[test]
    fn auto_size_truncates_remainder() {
        assert_eq!(auto_size(40, 0, 2, 1), 19);
        assert_eq!(auto_size(10, 3, 3, 2), 1);
        // no auto items: nothing to share
        assert_eq!(auto_size(10, 3, 0, 0), 0);
    }

    #[test]
    fn auto_size_clamps_overconstrained() {
        assert_eq!(auto_size(10, 12, 1, 1), 0);
        assert_eq!(auto_size(10, 9, 1, 1), 0);
    }

    #[test]
    fn separator_count_basic() {
        assert_eq!(separator_count(0), 0);
        assert_eq!(separator_count(1), 0);
        assert_eq!(separator_count(4), 3);
    }

    #[test]
    fn plan_two_auto_items_in_forty_columns() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 40,
            height: 5,
        };
        let plan = plan(Direction::Horizontal, area, &[AUTO_SIZE, AUTO_SIZE]);
        assert_eq!(plan.auto_size, 19);
        assert_eq!(plan.rects[0], Rect::new(0, 0, 19, 5));
        assert_eq!(plan.rects[1], Rect::new(20, 0, 19, 5));
        assert_eq!(plan.separators, vec![19]);
        assert_eq!(plan.consumed(Direction::Horizontal), 39);
    }

    #[test]
    fn plan_mixes_fixed_and_auto() {
        let area = Rect {
            x: 2,
            y: 3,
            width: 6,
            height: 20,
        };
        let plan = plan(Direction::Vertical, area, &[4, AUTO_SIZE, 5, AUTO_SIZE]);
        // 20 - 9 fixed - 3 separators = 8, split over two autos
        assert_eq!(plan.auto_size, 4);
        let heights: Vec<u16> = plan.rects.iter().map(|r| r.height).collect();
        assert_eq!(heights, vec![4, 4, 5, 4]);
        assert_eq!(plan.rects[1].y, 3 + 4 + 1);
        assert_eq!(plan.separators, vec![7, 12, 18]);
        assert!(plan.rects.iter().all(|r| r.x == 2 && r.width == 6));
        assert_eq!(plan.consumed(Direction::Vertical), 20);
    }

    #[test]
    fn plan_consumed_matches_space_minus_remainder() {
        let area = Rect::new(0, 0, 37, 1);
        for sizes in [
            vec![AUTO_SIZE; 1],
            vec![AUTO_SIZE; 3],
            vec![5, AUTO_SIZE, AUTO_SIZE, 2],
            vec![1, 2, 3],
        ] {
            let plan = plan(Direction::Horizontal, area, &sizes);
            let auto = sizes.iter().filter(|s| **s == AUTO_SIZE).count() as u32;
            let remainder = 37 - plan.consumed(Direction::Horizontal);
            if auto > 0 {
                assert!(remainder < auto, "sizes {sizes:?} left {remainder}");
            } else {
                let fixed: u32 = sizes.iter().map(|s| *s as u32).sum();
                assert_eq!(plan.consumed(Direction::Horizontal), fixed + sizes.len() as u32 - 1);
            }
        }
    }

    #[test]
    fn rect_contains_edge_cases() {
        let r = Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(!rect_contains(r, 0, 0));
        let r2 = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        };
        assert!(rect_contains(r2, 1, 1));
        assert!(!rect_contains(r2, 4, 1));
    }
}
