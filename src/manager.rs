//! The top-level compositor.
//!
//! A [`Manager`] owns the logical layout tree and decides what is visible: the
//! tree itself, or a single maximized window filling the whole screen. All of
//! its state sits behind one mutex, so the render loop, the input path and
//! background producers can share a manager without seeing a half-applied
//! maximize or restore.
//!
//! Lock order is manager, then layout, then window. Code running inside a
//! window (button callbacks) must not call back into the manager; it queues a
//! [`ManagerCommand`] instead, which the manager applies after the current
//! dispatch.
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender, unbounded};
use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::prelude::Rect;
use ratatui::style::Color;

use crate::clip::ClipRegion;
use crate::input::{ClickTracker, MouseAction};
use crate::layout::{Layout, rect_contains};
use crate::region::{MouseOutcome, Region};
use crate::shared::Shared;
use crate::surface::Surface;
use crate::theme;
use crate::window::WindowHandle;

#[derive(Debug, Clone)]
pub enum ManagerCommand {
    Maximize(WindowHandle),
    Restore,
    ToggleMaximize(WindowHandle),
}

/// Cloneable sender for [`ManagerCommand`]s.
#[derive(Debug, Clone)]
pub struct ManagerCommands {
    tx: Sender<ManagerCommand>,
}

impl ManagerCommands {
    /// Queue a command. Returns `false` once the manager is gone.
    pub fn send(&self, command: ManagerCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn maximize(&self, window: WindowHandle) -> bool {
        self.send(ManagerCommand::Maximize(window))
    }

    pub fn restore(&self) -> bool {
        self.send(ManagerCommand::Restore)
    }

    pub fn toggle_maximize(&self, window: WindowHandle) -> bool {
        self.send(ManagerCommand::ToggleMaximize(window))
    }
}

enum VisibleRoot {
    Logical,
    Maximized(WindowHandle),
}

struct ManagerState {
    logical: Option<Shared<Layout>>,
    visible: VisibleRoot,
    restore_rect: Rect,
    rect: Rect,
    background: Color,
    clicks: ClickTracker,
    captured: bool,
}

impl ManagerState {
    fn visible_root(&mut self) -> Option<&mut dyn Region> {
        match &mut self.visible {
            VisibleRoot::Logical => self.logical.as_mut().map(|root| root as &mut dyn Region),
            VisibleRoot::Maximized(window) => Some(window as &mut dyn Region),
        }
    }

    fn is_maximized(&self, window: &WindowHandle) -> bool {
        matches!(&self.visible, VisibleRoot::Maximized(current) if current.ptr_eq(window))
    }

    fn maximize(&mut self, window: WindowHandle) {
        self.restore_rect = window.rect();
        tracing::debug!(restore = ?self.restore_rect, "maximizing window");
        window.lock().set_rect(self.rect);
        self.visible = VisibleRoot::Maximized(window);
        self.captured = false;
    }

    fn restore(&mut self) -> bool {
        if matches!(self.visible, VisibleRoot::Logical) {
            return false;
        }
        let rect = self.restore_rect;
        if let Some(root) = self.visible_root() {
            root.set_rect(rect);
        }
        tracing::debug!(restore = ?rect, "restoring logical root");
        self.visible = VisibleRoot::Logical;
        self.captured = false;
        true
    }

    fn toggle_maximize(&mut self, window: WindowHandle) -> bool {
        if self.is_maximized(&window) {
            self.restore();
            return false;
        }
        self.restore();
        self.maximize(window);
        true
    }

    fn apply(&mut self, command: ManagerCommand) {
        match command {
            ManagerCommand::Maximize(window) => {
                self.restore();
                self.maximize(window);
            }
            ManagerCommand::Restore => {
                self.restore();
            }
            ManagerCommand::ToggleMaximize(window) => {
                self.toggle_maximize(window);
            }
        }
    }
}

pub struct Manager {
    state: Mutex<ManagerState>,
    tx: Sender<ManagerCommand>,
    rx: Receiver<ManagerCommand>,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            state: Mutex::new(ManagerState {
                logical: None,
                visible: VisibleRoot::Logical,
                restore_rect: Rect::default(),
                rect: Rect::default(),
                background: theme::background(),
                clicks: ClickTracker::new(),
                captured: false,
            }),
            tx,
            rx,
        }
    }

    fn state(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering poisoned manager lock");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Lock the state and apply every queued command first.
    fn guard(&self) -> MutexGuard<'_, ManagerState> {
        let mut state = self.state();
        self.drain(&mut state);
        state
    }

    fn drain(&self, state: &mut ManagerState) {
        while let Ok(command) = self.rx.try_recv() {
            state.apply(command);
        }
    }

    pub fn with_root(self, root: impl Into<Shared<Layout>>) -> Self {
        self.set_root(root);
        self
    }

    /// Install the logical root and make it visible, dropping any maximized
    /// window.
    pub fn set_root(&self, root: impl Into<Shared<Layout>>) {
        let mut state = self.state();
        let root = root.into();
        root.lock().set_rect(state.rect);
        state.logical = Some(root);
        state.visible = VisibleRoot::Logical;
        state.captured = false;
    }

    pub fn root(&self) -> Option<Shared<Layout>> {
        self.state().logical.clone()
    }

    pub fn with_background(self, color: Color) -> Self {
        self.state().background = color;
        self
    }

    pub fn rect(&self) -> Rect {
        self.state().rect
    }

    pub fn set_rect(&self, rect: Rect) {
        let mut state = self.guard();
        state.rect = rect;
        if let Some(root) = state.visible_root() {
            root.set_rect(rect);
        }
    }

    /// Show `window` alone, filling the manager. Its current rectangle is kept
    /// for [`Manager::restore`].
    pub fn maximize(&self, window: &WindowHandle) {
        let mut state = self.guard();
        state.restore();
        state.maximize(window.clone());
    }

    /// Hand the saved rectangle back to the maximized window and show the
    /// logical root again. Returns `false` when nothing was maximized.
    pub fn restore(&self) -> bool {
        self.guard().restore()
    }

    pub fn is_maximized(&self, window: &WindowHandle) -> bool {
        self.guard().is_maximized(window)
    }

    /// Returns whether `window` ends up maximized.
    pub fn toggle_maximize(&self, window: &WindowHandle) -> bool {
        self.guard().toggle_maximize(window.clone())
    }

    pub fn commands(&self) -> ManagerCommands {
        ManagerCommands {
            tx: self.tx.clone(),
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let mut state = self.guard();
        let rect = state.rect;
        let mut surface = ClipRegion::new(surface, rect);
        if state.background != Color::Reset {
            surface.fill_rect(rect, " ", theme::fill_style(state.background));
        }
        if let Some(root) = state.visible_root() {
            root.set_rect(rect);
            root.draw(&mut surface);
        }
    }

    pub fn focus(&self) {
        if let Some(root) = self.guard().visible_root() {
            root.focus();
        }
    }

    pub fn has_focus(&self) -> bool {
        self.guard()
            .visible_root()
            .is_some_and(|root| root.has_focus())
    }

    pub fn blur(&self) {
        if let Some(root) = self.guard().visible_root() {
            root.blur();
        }
    }

    pub fn handle_key(&self, key: &KeyEvent) -> bool {
        let mut state = self.guard();
        let handled = state
            .visible_root()
            .is_some_and(|root| root.handle_key(key));
        self.drain(&mut state);
        handled
    }

    /// Route one already-translated mouse action. Events outside the manager
    /// are ignored unless a region holds the mouse capture.
    pub fn handle_mouse(&self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        let mut state = self.guard();
        let outcome = Self::route_mouse(&mut state, action, event);
        self.drain(&mut state);
        outcome
    }

    fn route_mouse(state: &mut ManagerState, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        if !state.captured && !rect_contains(state.rect, event.column, event.row) {
            return MouseOutcome::IGNORED;
        }
        let outcome = state
            .visible_root()
            .map(|root| root.handle_mouse(action, event))
            .unwrap_or_default();
        state.captured = outcome.capture;
        outcome
    }

    /// Host entry point for raw crossterm events. Returns `true` when the
    /// event was handled.
    pub fn handle_event(&self, event: &Event) -> bool {
        let mut state = self.guard();
        let handled = match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => state
                .visible_root()
                .is_some_and(|root| root.handle_key(key)),
            Event::Mouse(mouse) => {
                let mut consumed = false;
                for action in state.clicks.translate(mouse) {
                    consumed |= Self::route_mouse(&mut state, action, mouse).consumed;
                }
                consumed
            }
            Event::Resize(width, height) => {
                let rect = Rect::new(0, 0, *width, *height);
                state.rect = rect;
                if let Some(root) = state.visible_root() {
                    root.set_rect(rect);
                }
                true
            }
            _ => false,
        };
        self.drain(&mut state);
        handled
    }
}

impl Region for Manager {
    fn rect(&self) -> Rect {
        Manager::rect(self)
    }

    fn set_rect(&mut self, rect: Rect) {
        Manager::set_rect(self, rect)
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        Manager::draw(self, surface)
    }

    fn focus(&mut self) {
        Manager::focus(self)
    }

    fn has_focus(&self) -> bool {
        Manager::has_focus(self)
    }

    fn blur(&mut self) {
        Manager::blur(self)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        Manager::handle_key(self, key)
    }

    fn handle_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        Manager::handle_mouse(self, action, event)
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Manager")
            .field("rect", &state.rect)
            .field("has_root", &state.logical.is_some())
            .field("maximized", &matches!(state.visible, VisibleRoot::Maximized(_)))
            .field("restore_rect", &state.restore_rect)
            .field("queued", &self.rx.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AUTO_SIZE;
    use crate::window::Window;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::buffer::Buffer;
    use ratatui::prelude::Direction;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn two_windows() -> (Manager, WindowHandle, WindowHandle) {
        let left = WindowHandle::new(Window::new().with_border(true).with_title("left"));
        let right = WindowHandle::new(Window::new().with_border(true).with_title("right"));
        let layout = Layout::new()
            .with_direction(Direction::Horizontal)
            .with_item(left.clone(), AUTO_SIZE)
            .with_item(right.clone(), AUTO_SIZE);
        let manager = Manager::new().with_root(layout);
        manager.set_rect(Rect::new(0, 0, 21, 6));
        (manager, left, right)
    }

    #[test]
    fn maximize_then_restore_returns_saved_rect() {
        let (manager, left, _right) = two_windows();
        let mut buf = Buffer::empty(Rect::new(0, 0, 21, 6));
        manager.draw(&mut buf);
        let before = left.rect();
        assert_eq!(before, Rect::new(0, 0, 10, 6));

        manager.maximize(&left);
        assert!(manager.is_maximized(&left));
        manager.draw(&mut buf);
        assert_eq!(left.rect(), Rect::new(0, 0, 21, 6));

        assert!(manager.restore());
        assert!(!manager.is_maximized(&left));
        assert_eq!(left.rect(), before);
        assert!(!manager.restore());
    }

    #[test]
    fn toggle_switches_between_windows() {
        let (manager, left, right) = two_windows();
        assert!(manager.toggle_maximize(&left));
        assert!(manager.toggle_maximize(&right));
        assert!(!manager.is_maximized(&left));
        assert!(manager.is_maximized(&right));
        assert!(!manager.toggle_maximize(&right));
        assert!(!manager.is_maximized(&right));
    }

    #[test]
    fn queued_commands_apply_on_next_dispatch() {
        let (manager, left, _right) = two_windows();
        let commands = manager.commands();
        assert!(commands.maximize(left.clone()));
        let mut buf = Buffer::empty(Rect::new(0, 0, 21, 6));
        manager.draw(&mut buf);
        assert!(manager.is_maximized(&left));
        commands.restore();
        assert!(!manager.is_maximized(&left));
    }

    #[test]
    fn button_callback_maximizes_through_queue() {
        let (manager, left, _right) = two_windows();
        let commands = manager.commands();
        let handle = left.downgrade();
        left.lock().add_button(
            crate::window::Button::new('M', crate::window::ButtonAlignment::Right).with_on_click(
                move |_, _| {
                    if let Some(window) = handle.upgrade() {
                        commands.toggle_maximize(window);
                    }
                },
            ),
        );
        let mut buf = Buffer::empty(Rect::new(0, 0, 21, 6));
        manager.draw(&mut buf);
        // left window is 10 wide: the button sits at x + width - 3
        manager.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 7, 0));
        assert!(manager.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 7, 0)));
        assert!(manager.is_maximized(&left));
    }

    #[test]
    fn mouse_outside_rect_is_ignored() {
        let (manager, _left, _right) = two_windows();
        assert!(!manager.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 30, 2)));
        let key = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(!manager.handle_event(&key));
    }

    #[test]
    fn resize_event_sets_rect() {
        let (manager, _left, _right) = two_windows();
        assert!(manager.handle_event(&Event::Resize(50, 10)));
        assert_eq!(manager.rect(), Rect::new(0, 0, 50, 10));
        assert_eq!(manager.root().unwrap().rect(), Rect::new(0, 0, 50, 10));
    }

    #[test]
    fn background_fills_before_root() {
        let manager = Manager::new().with_background(Color::Blue);
        manager.set_rect(Rect::new(0, 0, 3, 2));
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        manager.draw(&mut buf);
        assert_eq!(buf.cell((2, 1)).unwrap().bg, Color::Blue);
        assert_eq!(buf.cell((3, 1)).unwrap().bg, Color::Reset);
        assert!(!manager.has_focus());
    }
}
