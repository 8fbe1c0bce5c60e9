use std::fmt;
use std::sync::Arc;

use super::Window;

/// Invoked with the window and the index of the clicked button.
pub type ButtonCallback = Arc<dyn Fn(&mut Window, usize) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAlignment {
    Left,
    Right,
}

const LEFT_START: i16 = 2;
const RIGHT_START: i16 = -3;
const STRIDE: i16 = 3;

/// A one-glyph title-bar button, drawn as `[symbol]`.
#[derive(Clone)]
pub struct Button {
    alignment: ButtonAlignment,
    symbol: char,
    on_click: Option<ButtonCallback>,
    offset: i16,
}

impl Button {
    pub fn new(symbol: char, alignment: ButtonAlignment) -> Self {
        Self {
            alignment,
            symbol,
            on_click: None,
            offset: 0,
        }
    }

    pub fn with_on_click<F>(mut self, on_click: F) -> Self
    where
        F: Fn(&mut Window, usize) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(on_click));
        self
    }

    pub fn alignment(&self) -> ButtonAlignment {
        self.alignment
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    /// Column of the glyph relative to the window: from the left edge when
    /// positive, from the right edge when negative.
    pub fn offset(&self) -> i16 {
        self.offset
    }

    pub(super) fn on_click(&self) -> Option<ButtonCallback> {
        self.on_click.clone()
    }

    /// Absolute column of the glyph for a window at `x` that is `width` wide.
    pub fn column(&self, x: u16, width: u16) -> i32 {
        if self.offset < 0 {
            x as i32 + width as i32 + self.offset as i32
        } else {
            x as i32 + self.offset as i32
        }
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("alignment", &self.alignment)
            .field("symbol", &self.symbol)
            .field("offset", &self.offset)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Number every button from its edge, in list order.
///
/// Only adding a button calls this; removing one leaves the remaining
/// offsets (and any gap) untouched.
pub(super) fn assign_offsets(buttons: &mut [Button]) {
    let (mut left, mut right) = (LEFT_START, RIGHT_START);
    for button in buttons {
        match button.alignment {
            ButtonAlignment::Left => {
                button.offset = left;
                left += STRIDE;
            }
            ButtonAlignment::Right => {
                button.offset = right;
                right -= STRIDE;
            }
        }
    }
}
