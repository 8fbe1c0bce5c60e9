use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::input::MouseAction;
use crate::layout::rect_contains;
use crate::surface::Surface;

/// Result of offering a mouse event to a region.
///
/// `capture` asks the container to route every following mouse event to this
/// region, even outside its rectangle, until it answers without `capture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseOutcome {
    pub consumed: bool,
    pub capture: bool,
}

impl MouseOutcome {
    pub const IGNORED: Self = Self {
        consumed: false,
        capture: false,
    };
    pub const CONSUMED: Self = Self {
        consumed: true,
        capture: false,
    };
    pub const CAPTURED: Self = Self {
        consumed: true,
        capture: true,
    };
}

/// A drawable, focusable, input-handling unit of content.
///
/// Containers own the geometry of their children: they call
/// [`Region::set_rect`] before every [`Region::draw`], and the region is
/// expected to stay inside that rectangle. Containers also hand regions a
/// clipped surface, so misbehaving content cannot overdraw its siblings.
pub trait Region: Send {
    fn rect(&self) -> Rect;

    fn set_rect(&mut self, rect: Rect);

    fn draw(&mut self, surface: &mut dyn Surface);

    /// Take keyboard focus. Containers pass this on to a child.
    fn focus(&mut self) {}

    fn has_focus(&self) -> bool {
        false
    }

    fn blur(&mut self) {}

    /// Returns `true` when the key was handled.
    fn handle_key(&mut self, _key: &KeyEvent) -> bool {
        false
    }

    fn handle_mouse(&mut self, _action: MouseAction, _event: &MouseEvent) -> MouseOutcome {
        MouseOutcome::IGNORED
    }

    fn in_rect(&self, column: u16, row: u16) -> bool {
        rect_contains(self.rect(), column, row)
    }
}

impl<R: Region + ?Sized> Region for Box<R> {
    fn rect(&self) -> Rect {
        (**self).rect()
    }

    fn set_rect(&mut self, rect: Rect) {
        (**self).set_rect(rect)
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        (**self).draw(surface)
    }

    fn focus(&mut self) {
        (**self).focus()
    }

    fn has_focus(&self) -> bool {
        (**self).has_focus()
    }

    fn blur(&mut self) {
        (**self).blur()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        (**self).handle_key(key)
    }

    fn handle_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        (**self).handle_mouse(action, event)
    }
}
