use std::fmt;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::prelude::{Direction, Rect};
use ratatui::style::{Color, Modifier, Style};

use super::{
    Item, MIN_ITEM_LENGTH, Plan, Splitter, axis_length, plan, rect_contains, separator_count,
};
use crate::clip::ClipRegion;
use crate::error::LayoutError;
use crate::input::MouseAction;
use crate::region::{MouseOutcome, Region};
use crate::surface::Surface;
use crate::theme::{self, Glyphs};

/// Receives a key before the layout routes it; `None` swallows it.
pub type InputCapture = Box<dyn FnMut(KeyEvent) -> Option<KeyEvent> + Send>;

/// Receives a mouse event before the layout routes it; `None` swallows it.
pub type MouseCapture =
    Box<dyn FnMut(MouseAction, MouseEvent) -> Option<(MouseAction, MouseEvent)> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    splitter: usize,
    last_col: u16,
    last_row: u16,
}

/// Arranges items along one axis with a draggable splitter between each pair.
///
/// Not internally synchronized: share it through [`crate::Shared`] or keep it
/// on the render thread.
pub struct Layout {
    items: Vec<Item>,
    splitters: Vec<Splitter>,
    direction: Direction,
    separators: bool,
    separator_style: Style,
    glyphs: Glyphs,
    background: Color,
    rect: Rect,
    drag: Option<DragState>,
    focused_splitter: Option<usize>,
    captured: Option<usize>,
    input_capture: Option<InputCapture>,
    mouse_capture: Option<MouseCapture>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            splitters: Vec::new(),
            direction: Direction::Vertical,
            separators: false,
            separator_style: theme::separator_style(),
            glyphs: Glyphs::default(),
            background: theme::background(),
            rect: Rect::default(),
            drag: None,
            focused_splitter: None,
            captured: None,
            input_capture: None,
            mouse_capture: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.set_direction(direction);
        self
    }

    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = direction;
        self.drag = None;
        self.rebuild_splitters();
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether separator lines are drawn. The separator cell is reserved
    /// between adjacent items either way.
    pub fn with_separators(mut self, show: bool) -> Self {
        self.separators = show;
        self
    }

    pub fn set_separators(&mut self, show: bool) -> &mut Self {
        self.separators = show;
        self
    }

    pub fn separators(&self) -> bool {
        self.separators
    }

    pub fn with_separator_color(mut self, color: Color) -> Self {
        self.separator_style = self.separator_style.fg(color);
        self
    }

    /// Replace the separator modifiers, e.g. `Modifier::BOLD | Modifier::DIM`.
    pub fn with_separator_modifier(mut self, modifier: Modifier) -> Self {
        self.separator_style.add_modifier = modifier;
        self.separator_style.sub_modifier = Modifier::empty();
        self
    }

    pub fn separator_color(&self) -> Color {
        self.separator_style.fg.unwrap_or(Color::Reset)
    }

    pub fn separator_modifier(&self) -> Modifier {
        self.separator_style.add_modifier
    }

    pub fn separator_style(&self) -> Style {
        self.separator_style
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Anything but `Color::Reset` pre-fills the whole layout rectangle.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn with_input_capture<F>(mut self, capture: F) -> Self
    where
        F: FnMut(KeyEvent) -> Option<KeyEvent> + Send + 'static,
    {
        self.input_capture = Some(Box::new(capture));
        self
    }

    pub fn set_input_capture(&mut self, capture: Option<InputCapture>) -> &mut Self {
        self.input_capture = capture;
        self
    }

    pub fn has_input_capture(&self) -> bool {
        self.input_capture.is_some()
    }

    pub fn with_mouse_capture<F>(mut self, capture: F) -> Self
    where
        F: FnMut(MouseAction, MouseEvent) -> Option<(MouseAction, MouseEvent)> + Send + 'static,
    {
        self.mouse_capture = Some(Box::new(capture));
        self
    }

    pub fn set_mouse_capture(&mut self, capture: Option<MouseCapture>) -> &mut Self {
        self.mouse_capture = capture;
        self
    }

    pub fn has_mouse_capture(&self) -> bool {
        self.mouse_capture.is_some()
    }

    pub fn with_item<R: Region + 'static>(mut self, region: R, size: u16) -> Self {
        self.add_item(region, size);
        self
    }

    /// Append a region. `size` is a fixed length along the axis or
    /// [`super::AUTO_SIZE`].
    pub fn add_item<R: Region + 'static>(&mut self, region: R, size: u16) -> &mut Self {
        self.items.push(Item::new(Box::new(region), size));
        tracing::debug!(index = self.items.len() - 1, size, "added layout item");
        self.reset_interaction();
        self.rebuild_splitters();
        self
    }

    /// Remove and return the region at `index`; `None` when out of range.
    pub fn remove_item(&mut self, index: usize) -> Option<Box<dyn Region>> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        tracing::debug!(index, "removed layout item");
        self.reset_interaction();
        self.rebuild_splitters();
        Some(item.into_region())
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Change an item's length; no-op when out of range.
    pub fn set_item_size(&mut self, index: usize, size: u16) -> &mut Self {
        if let Some(item) = self.items.get_mut(index) {
            item.set_size(size);
            self.rebuild_splitters();
        }
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear_items(&mut self) -> &mut Self {
        self.items.clear();
        self.splitters.clear();
        self.reset_interaction();
        self
    }

    pub fn splitters(&self) -> &[Splitter] {
        &self.splitters
    }

    /// Index of the highlighted splitter, set by pressing on it.
    pub fn focused_splitter(&self) -> Option<usize> {
        self.focused_splitter
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Placement of every item for the current rectangle and sizes.
    pub fn plan(&self) -> Plan {
        let sizes: Vec<u16> = self.items.iter().map(Item::size).collect();
        plan(self.direction, self.rect, &sizes)
    }

    /// Report layouts whose fixed sizes leave auto items less than nothing.
    /// Drawing such a layout clamps auto items to zero length.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let space = axis_length(self.direction, self.rect);
        let fixed: u32 = self.items.iter().map(|item| item.size() as u32).sum();
        let separators = separator_count(self.items.len());
        if fixed + separators as u32 > space as u32 {
            return Err(LayoutError::Overconstrained {
                space,
                fixed,
                separators,
            });
        }
        Ok(())
    }

    fn reset_interaction(&mut self) {
        self.drag = None;
        self.captured = None;
        if self
            .focused_splitter
            .is_some_and(|index| index >= separator_count(self.items.len()) as usize)
        {
            self.focused_splitter = None;
        }
    }

    fn rebuild_splitters(&mut self) {
        let plan = self.plan();
        if let Err(err) = self.validate()
            && !self.items.is_empty()
        {
            tracing::warn!(%err, "auto-sized items clamped to zero length");
        }
        self.splitters = plan
            .separators
            .iter()
            .enumerate()
            .map(|(index, at)| Splitter::across(self.direction, self.rect, *at, index))
            .collect();
    }

    fn separator_glyph(&self, index: usize) -> &'static str {
        let focused = self.focused_splitter == Some(index);
        match (self.direction, focused) {
            (Direction::Horizontal, false) => self.glyphs.vertical,
            (Direction::Horizontal, true) => self.glyphs.vertical_focus,
            (Direction::Vertical, false) => self.glyphs.horizontal,
            (Direction::Vertical, true) => self.glyphs.horizontal_focus,
        }
    }

    fn draw_separator(&self, surface: &mut dyn Surface, index: usize, at: u16) {
        let glyph = self.separator_glyph(index);
        let line = match self.direction {
            Direction::Horizontal => Rect {
                x: at,
                y: self.rect.y,
                width: 1,
                height: self.rect.height,
            },
            Direction::Vertical => Rect {
                x: self.rect.x,
                y: at,
                width: self.rect.width,
                height: 1,
            },
        };
        surface.fill_rect(line, glyph, self.separator_style);
    }

    /// Blur every focused child except `keep`.
    fn blur_others(&mut self, keep: usize) {
        for (index, item) in self.items.iter_mut().enumerate() {
            if index != keep && item.region().has_focus() {
                item.region_mut().blur();
            }
        }
    }

    fn dispatch_to_child(
        &mut self,
        index: usize,
        action: MouseAction,
        event: &MouseEvent,
    ) -> MouseOutcome {
        let Some(item) = self.items.get_mut(index) else {
            self.captured = None;
            return MouseOutcome::IGNORED;
        };
        let outcome = item.region_mut().handle_mouse(action, event);
        let focused = item.region().has_focus();
        self.captured = outcome.capture.then_some(index);
        if outcome.consumed {
            self.focused_splitter = None;
            if focused {
                self.blur_others(index);
            }
        }
        outcome
    }

    fn begin_drag(&mut self, splitter: usize, column: u16, row: u16) {
        self.focused_splitter = Some(splitter);
        self.drag = Some(DragState {
            splitter,
            last_col: column,
            last_row: row,
        });
        for item in &mut self.items {
            item.region_mut().blur();
        }
        tracing::debug!(splitter, column, row, "splitter drag started");
    }

    fn end_drag(&mut self) {
        if let Some(state) = self.drag.take() {
            tracing::debug!(splitter = state.splitter, "splitter drag finished");
        }
        self.rebuild_splitters();
    }

    fn handle_drag(&mut self, action: MouseAction, column: u16, row: u16) -> MouseOutcome {
        let Some(state) = self.drag.as_mut() else {
            return MouseOutcome::IGNORED;
        };
        match action {
            MouseAction::Move => {
                let dx = column as i32 - state.last_col as i32;
                let dy = row as i32 - state.last_row as i32;
                let splitter = state.splitter;
                let applied = self.apply_drag(splitter, dx, dy);
                // The anchor follows the splitter, not the cursor, so a clamped
                // overshoot has to be undone before the splitter moves back.
                if let (Some(delta), Some(state)) = (applied, self.drag.as_mut()) {
                    match self.direction {
                        Direction::Horizontal => {
                            state.last_col = (state.last_col as i32 + delta).max(0) as u16;
                        }
                        Direction::Vertical => {
                            state.last_row = (state.last_row as i32 + delta).max(0) as u16;
                        }
                    }
                }
                MouseOutcome::CAPTURED
            }
            MouseAction::LeftUp => {
                self.end_drag();
                MouseOutcome::CONSUMED
            }
            _ => MouseOutcome::CAPTURED,
        }
    }

    /// Move the boundary between the splitter's two items by the delta along
    /// the layout axis. Both items become fixed-size, each keeping at least
    /// [`MIN_ITEM_LENGTH`]. Splitters are rebuilt once the drag ends.
    ///
    /// Geometry comes from the sizing walk over the current rectangle, not from
    /// the children's last drawn rectangles, which are stale until the next
    /// draw after a resize or an item change.
    ///
    /// Returns the delta actually applied along the axis after clamping, or
    /// `None` for an unknown splitter or when the two items are too small to
    /// give either of them a cell.
    pub fn apply_drag(&mut self, splitter: usize, dx: i32, dy: i32) -> Option<i32> {
        let (a, b) = self.splitters.get(splitter).map(Splitter::items)?;
        let plan = self.plan();
        let (&ra, &rb) = (plan.rects.get(a)?, plan.rects.get(b)?);
        let (next_a, next_b, len_a, len_b, delta) = match self.direction {
            Direction::Horizontal => {
                let delta = clamp_delta(dx, ra.width, rb.width)?;
                let width_a = (ra.width as i32 + delta) as u16;
                let width_b = (rb.width as i32 - delta) as u16;
                let next_a = Rect {
                    width: width_a,
                    ..ra
                };
                let next_b = Rect {
                    x: (rb.x as i32 + delta).max(0) as u16,
                    width: width_b,
                    ..rb
                };
                (next_a, next_b, width_a, width_b, delta)
            }
            Direction::Vertical => {
                let delta = clamp_delta(dy, ra.height, rb.height)?;
                let height_a = (ra.height as i32 + delta) as u16;
                let height_b = (rb.height as i32 - delta) as u16;
                let next_a = Rect {
                    height: height_a,
                    ..ra
                };
                let next_b = Rect {
                    y: (rb.y as i32 + delta).max(0) as u16,
                    height: height_b,
                    ..rb
                };
                (next_a, next_b, height_a, height_b, delta)
            }
        };
        tracing::trace!(splitter, dx, dy, delta, len_a, len_b, "splitter dragged");
        self.items[a].region_mut().set_rect(next_a);
        self.items[b].region_mut().set_rect(next_b);
        self.items[a].set_size(len_a);
        self.items[b].set_size(len_b);
        Some(delta)
    }

    fn capture_mouse(
        &mut self,
        action: MouseAction,
        event: MouseEvent,
    ) -> Option<(MouseAction, MouseEvent)> {
        match self.mouse_capture.as_mut() {
            Some(capture) => capture(action, event),
            None => Some((action, event)),
        }
    }
}

fn clamp_delta(delta: i32, a: u16, b: u16) -> Option<i32> {
    let lo = MIN_ITEM_LENGTH as i32 - a as i32;
    let hi = b as i32 - MIN_ITEM_LENGTH as i32;
    (lo <= hi).then(|| delta.clamp(lo, hi))
}

impl Region for Layout {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        if self.rect == rect {
            return;
        }
        self.rect = rect;
        self.rebuild_splitters();
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let mut surface = ClipRegion::new(surface, self.rect);
        if self.background != Color::Reset {
            surface.fill_rect(self.rect, " ", theme::fill_style(self.background));
        }

        let plan = self.plan();
        for (item, rect) in self.items.iter_mut().zip(plan.rects.iter()) {
            let region = item.region_mut();
            region.set_rect(*rect);
            region.draw(&mut ClipRegion::new(&mut surface, *rect));
        }
        if self.separators {
            for (index, at) in plan.separators.iter().enumerate() {
                self.draw_separator(&mut surface, index, *at);
            }
        }
    }

    /// Hand focus to the first item, unless a splitter holds it.
    fn focus(&mut self) {
        if self.focused_splitter.is_some() {
            return;
        }
        if let Some(item) = self.items.first_mut() {
            item.region_mut().focus();
        }
    }

    fn has_focus(&self) -> bool {
        self.items.iter().any(|item| item.region().has_focus())
    }

    fn blur(&mut self) {
        self.focused_splitter = None;
        for item in &mut self.items {
            if item.region().has_focus() {
                item.region_mut().blur();
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let key = match self.input_capture.as_mut() {
            Some(capture) => match capture(*key) {
                Some(key) => key,
                None => return true,
            },
            None => *key,
        };
        match self
            .items
            .iter_mut()
            .find(|item| item.region().has_focus())
        {
            Some(item) => item.region_mut().handle_key(&key),
            None => false,
        }
    }

    fn handle_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        let Some((action, event)) = self.capture_mouse(action, *event) else {
            return MouseOutcome::IGNORED;
        };
        let (column, row) = (event.column, event.row);

        // An active drag sees Move and LeftUp before any child; children over
        // which the cursor passes must not steal the captured drag.
        if self.drag.is_some() {
            return self.handle_drag(action, column, row);
        }
        if let Some(index) = self.captured {
            return self.dispatch_to_child(index, action, &event);
        }
        if !rect_contains(self.rect, column, row) {
            return MouseOutcome::IGNORED;
        }

        for index in 0..self.items.len() {
            let outcome = self.dispatch_to_child(index, action, &event);
            if outcome.consumed {
                return outcome;
            }
        }

        match action {
            MouseAction::LeftDown => {
                if let Some(splitter) = self
                    .splitters
                    .iter()
                    .position(|splitter| splitter.contains(column, row))
                {
                    self.begin_drag(splitter, column, row);
                    return MouseOutcome::CAPTURED;
                }
            }
            MouseAction::LeftUp => self.rebuild_splitters(),
            _ => {}
        }
        MouseOutcome::IGNORED
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("direction", &self.direction)
            .field("rect", &self.rect)
            .field("items", &self.items)
            .field("splitters", &self.splitters)
            .field("separators", &self.separators)
            .field("focused_splitter", &self.focused_splitter)
            .field("dragging", &self.drag.is_some())
            .finish_non_exhaustive()
    }
}
