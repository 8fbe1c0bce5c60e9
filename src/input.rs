//! Semantic mouse actions.
//!
//! Crossterm reports raw button transitions. Regions react to a smaller
//! vocabulary: presses, releases, clicks and pointer movement. [`ClickTracker`]
//! performs that translation and synthesizes a [`MouseAction::LeftClick`] when a
//! left button is released on the same cell it went down on.
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Pointer motion, with or without a button held.
    Move,
    LeftDown,
    LeftUp,
    LeftClick,
    RightDown,
    RightUp,
    MiddleDown,
    MiddleUp,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

impl MouseAction {
    pub fn from_kind(kind: MouseEventKind) -> Self {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => Self::LeftDown,
            MouseEventKind::Down(MouseButton::Right) => Self::RightDown,
            MouseEventKind::Down(MouseButton::Middle) => Self::MiddleDown,
            MouseEventKind::Up(MouseButton::Left) => Self::LeftUp,
            MouseEventKind::Up(MouseButton::Right) => Self::RightUp,
            MouseEventKind::Up(MouseButton::Middle) => Self::MiddleUp,
            MouseEventKind::Drag(_) | MouseEventKind::Moved => Self::Move,
            MouseEventKind::ScrollUp => Self::ScrollUp,
            MouseEventKind::ScrollDown => Self::ScrollDown,
            MouseEventKind::ScrollLeft => Self::ScrollLeft,
            MouseEventKind::ScrollRight => Self::ScrollRight,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ClickTracker {
    pressed_at: Option<(u16, u16)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one raw event to the actions it produces, in dispatch order.
    pub fn translate(&mut self, event: &MouseEvent) -> Vec<MouseAction> {
        let action = MouseAction::from_kind(event.kind);
        let position = (event.column, event.row);
        match action {
            MouseAction::LeftDown => {
                self.pressed_at = Some(position);
                vec![action]
            }
            MouseAction::LeftUp => {
                if self.pressed_at.take() == Some(position) {
                    vec![action, MouseAction::LeftClick]
                } else {
                    vec![action]
                }
            }
            _ => vec![action],
        }
    }
}
