pub mod button;
pub mod decorator;

pub use button::{Button, ButtonAlignment, ButtonCallback};
pub use decorator::BorderedBox;

use std::fmt;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Alignment;
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::clip::ClipRegion;
use crate::input::MouseAction;
use crate::region::{MouseOutcome, Region};
use crate::shared::Shared;
use crate::surface::{Surface, print};
use crate::theme::{self, Glyphs};

/// A window shared between the layout tree and the manager.
pub type WindowHandle = Shared<Window>;

/// A titled container around one content region, with title-bar buttons.
///
/// Not internally synchronized; see [`WindowHandle`].
pub struct Window {
    rect: Rect,
    chrome: BorderedBox,
    root: Option<Box<dyn Region>>,
    buttons: Vec<Button>,
    captured: bool,
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Window {
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            chrome: BorderedBox::new(),
            root: None,
            buttons: Vec::new(),
            captured: false,
        }
    }

    pub fn with_root<R: Region + 'static>(mut self, root: R) -> Self {
        self.set_root(root);
        self
    }

    pub fn set_root<R: Region + 'static>(&mut self, root: R) -> &mut Self {
        let mut root: Box<dyn Region> = Box::new(root);
        root.set_rect(BorderedBox::inner(self.rect));
        self.root = Some(root);
        self.captured = false;
        self
    }

    pub fn take_root(&mut self) -> Option<Box<dyn Region>> {
        self.captured = false;
        self.root.take()
    }

    pub fn root(&self) -> Option<&dyn Region> {
        self.root.as_deref()
    }

    pub fn root_mut(&mut self) -> Option<&mut (dyn Region + 'static)> {
        self.root.as_deref_mut()
    }

    /// Windows without a border draw no title and take no button clicks.
    pub fn with_border(mut self, show: bool) -> Self {
        self.chrome.set_border(show);
        self
    }

    pub fn set_border(&mut self, show: bool) -> &mut Self {
        self.chrome.set_border(show);
        self
    }

    pub fn has_border(&self) -> bool {
        self.chrome.has_border()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.chrome.set_title(title);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.chrome.set_title(title);
        self
    }

    pub fn title(&self) -> &str {
        self.chrome.title()
    }

    pub fn with_title_color(mut self, color: Color) -> Self {
        self.chrome.set_title_color(color);
        self
    }

    pub fn with_title_alignment(mut self, alignment: Alignment) -> Self {
        self.chrome.set_title_alignment(alignment);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.chrome.set_background(color);
        self
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.chrome.set_border_color(color);
        self
    }

    pub fn with_border_modifier(mut self, modifier: Modifier) -> Self {
        self.chrome.set_border_modifier(modifier);
        self
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.chrome.set_glyphs(glyphs);
        self
    }

    pub fn chrome(&self) -> &BorderedBox {
        &self.chrome
    }

    pub fn chrome_mut(&mut self) -> &mut BorderedBox {
        &mut self.chrome
    }

    pub fn with_button<F>(mut self, symbol: char, alignment: ButtonAlignment, on_click: F) -> Self
    where
        F: Fn(&mut Window, usize) + Send + Sync + 'static,
    {
        self.add_button(Button::new(symbol, alignment).with_on_click(on_click));
        self
    }

    /// Append a title-bar button and renumber every button's offset.
    pub fn add_button(&mut self, button: Button) -> &mut Self {
        tracing::debug!(symbol = %button.symbol(), alignment = ?button.alignment(), "added window button");
        self.buttons.push(button);
        button::assign_offsets(&mut self.buttons);
        self
    }

    /// Remove the button at `index`. Offsets of the remaining buttons are kept
    /// as they were.
    pub fn remove_button(&mut self, index: usize) -> Option<Button> {
        (index < self.buttons.len()).then(|| self.buttons.remove(index))
    }

    pub fn button(&self, index: usize) -> Option<&Button> {
        self.buttons.get(index)
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    pub fn clear_buttons(&mut self) -> &mut Self {
        self.buttons.clear();
        self
    }

    fn button_at(&self, column: u16, row: u16) -> Option<usize> {
        if !self.has_border() || row != self.rect.y {
            return None;
        }
        self.buttons
            .iter()
            .position(|button| button.column(self.rect.x, self.rect.width) == column as i32)
    }

    fn click_button(&mut self, index: usize) {
        let Some(button) = self.buttons.get(index) else {
            return;
        };
        tracing::debug!(index, symbol = %button.symbol(), title = self.title(), "window button clicked");
        if let Some(on_click) = button.on_click() {
            on_click(self, index);
        }
    }

    fn draw_buttons(&self, surface: &mut dyn Surface) {
        let mut surface = ClipRegion::new(surface, self.rect);
        let style = Style::default().fg(theme::button());
        let mut label = String::with_capacity(6);
        for button in &self.buttons {
            let start = button.column(self.rect.x, self.rect.width) - 1;
            let Ok(start) = u16::try_from(start) else {
                continue;
            };
            label.clear();
            label.push('[');
            label.push(button.symbol());
            label.push(']');
            print(&mut surface, &label, start, self.rect.y, 3, Alignment::Left, style);
        }
    }
}

impl Region for Window {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        if let Some(root) = self.root.as_mut() {
            root.set_rect(BorderedBox::inner(rect));
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        // the rule glyph follows the content's focus as of this frame
        let focused = self.has_focus();
        self.chrome.set_focused(focused);
        let inner = self.chrome.draw(surface, self.rect);

        if let Some(root) = self.root.as_mut() {
            root.set_rect(inner);
            root.draw(&mut ClipRegion::new(surface, inner));
        }

        if self.has_border() {
            self.draw_buttons(surface);
        }
    }

    fn focus(&mut self) {
        match self.root.as_mut() {
            Some(root) => root.focus(),
            None => self.chrome.set_focused(true),
        }
    }

    fn has_focus(&self) -> bool {
        match self.root.as_ref() {
            Some(root) => root.has_focus(),
            None => self.chrome.is_focused(),
        }
    }

    fn blur(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.blur();
        }
        self.chrome.set_focused(false);
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match self.root.as_mut() {
            Some(root) => root.handle_key(key),
            None => false,
        }
    }

    fn handle_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        if !self.captured && !self.in_rect(event.column, event.row) {
            return MouseOutcome::IGNORED;
        }

        if action == MouseAction::LeftClick
            && !self.captured
            && let Some(index) = self.button_at(event.column, event.row)
        {
            self.click_button(index);
            return MouseOutcome::CONSUMED;
        }

        match self.root.as_mut() {
            Some(root) => {
                let outcome = root.handle_mouse(action, event);
                self.captured = outcome.capture;
                outcome
            }
            None => {
                if action == MouseAction::LeftClick {
                    self.chrome.set_focused(true);
                    return MouseOutcome::CONSUMED;
                }
                MouseOutcome::IGNORED
            }
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("rect", &self.rect)
            .field("title", &self.chrome.title())
            .field("border", &self.chrome.has_border())
            .field("buttons", &self.buttons)
            .field("has_root", &self.root.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::buffer::Buffer;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Fill {
        rect: Rect,
        focused: bool,
        clicks: usize,
    }

    impl Region for Fill {
        fn rect(&self) -> Rect {
            self.rect
        }
        fn set_rect(&mut self, rect: Rect) {
            self.rect = rect;
        }
        fn draw(&mut self, surface: &mut dyn Surface) {
            // ignores its rect on purpose
            surface.fill_rect(Rect::new(0, 0, 100, 100), "#", Style::default());
        }
        fn focus(&mut self) {
            self.focused = true;
        }
        fn has_focus(&self) -> bool {
            self.focused
        }
        fn blur(&mut self) {
            self.focused = false;
        }
        fn handle_key(&mut self, _key: &KeyEvent) -> bool {
            true
        }
        fn handle_mouse(&mut self, action: MouseAction, _event: &MouseEvent) -> MouseOutcome {
            if action == MouseAction::LeftClick {
                self.clicks += 1;
                self.focused = true;
                return MouseOutcome::CONSUMED;
            }
            MouseOutcome::IGNORED
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(""))
            .collect()
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn framed() -> Window {
        let mut window = Window::new()
            .with_border(true)
            .with_glyphs(theme::ASCII_GLYPHS)
            .with_title("w")
            .with_root(Fill::default());
        window.set_rect(Rect::new(1, 1, 12, 4));
        window
    }

    #[test]
    fn draw_composes_chrome_content_and_buttons() {
        let mut window = framed()
            .with_button('x', ButtonAlignment::Right, |_, _| {})
            .with_button('m', ButtonAlignment::Left, |_, _| {});
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 6));
        window.draw(&mut buf);
        assert_eq!(row(&buf, 0), "              ");
        assert_eq!(row(&buf, 1), " -[m]-w--[x]- ");
        assert_eq!(row(&buf, 2), " ############ ");
        assert_eq!(row(&buf, 4), " ############ ");
        assert_eq!(row(&buf, 5), "              ");
        assert_eq!(window.root().unwrap().rect(), Rect::new(1, 2, 12, 3));
        assert_eq!(buf.cell((3, 1)).unwrap().fg, theme::button());
    }

    #[test]
    fn borderless_window_still_reserves_title_row() {
        let mut window = Window::new()
            .with_root(Fill::default())
            .with_button('x', ButtonAlignment::Left, |_, _| {
                panic!("borderless windows take no button clicks")
            });
        window.set_rect(Rect::new(0, 0, 4, 3));
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 3));
        window.draw(&mut buf);
        assert_eq!(row(&buf, 0), "    ");
        assert_eq!(row(&buf, 1), "####");
        assert!(window.handle_mouse(MouseAction::LeftClick, &click(2, 0)).consumed);
        assert!(window.has_focus());
    }

    #[test]
    fn rule_follows_content_focus_each_draw() {
        let mut window = framed();
        let mut buf = Buffer::empty(Rect::new(0, 0, 14, 6));
        window.draw(&mut buf);
        assert!(row(&buf, 1).starts_with(" -"));
        window.root_mut().unwrap().focus();
        window.draw(&mut buf);
        assert!(row(&buf, 1).starts_with(" ="));
        assert!(window.chrome().is_focused());
        window.blur();
        window.draw(&mut buf);
        assert!(row(&buf, 1).starts_with(" -"));
    }

    #[test]
    fn click_on_button_runs_callback_and_consumes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let mut window = framed().with_button('x', ButtonAlignment::Right, move |window, index| {
            assert_eq!(index, 0);
            window.set_title("closed");
            counter.fetch_add(1, Ordering::SeqCst);
        });
        // right edge x + width - 3
        assert!(window.handle_mouse(MouseAction::LeftClick, &click(10, 1)).consumed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(window.title(), "closed");

        // the bracket cells are not the button
        window.handle_mouse(MouseAction::LeftClick, &click(9, 1));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn other_clicks_reach_content() {
        let mut window = framed().with_button('x', ButtonAlignment::Left, |_, _| {});
        assert!(window.handle_mouse(MouseAction::LeftClick, &click(5, 3)).consumed);
        assert!(window.handle_mouse(MouseAction::LeftClick, &click(7, 1)).consumed);
        assert!(window.has_focus());
        assert!(!window.handle_mouse(MouseAction::LeftClick, &click(0, 0)).consumed);
    }

    #[test]
    fn button_without_callback_still_consumes() {
        let mut window = framed();
        window.add_button(Button::new('?', ButtonAlignment::Left));
        assert!(window.handle_mouse(MouseAction::LeftClick, &click(3, 1)).consumed);
        assert!(!window.has_focus());
    }

    #[test]
    fn removing_a_button_keeps_other_offsets() {
        let mut window = Window::new()
            .with_button('a', ButtonAlignment::Left, |_, _| {})
            .with_button('b', ButtonAlignment::Left, |_, _| {})
            .with_button('c', ButtonAlignment::Right, |_, _| {});
        assert!(window.remove_button(0).is_some());
        assert!(window.remove_button(9).is_none());
        assert_eq!(window.button_count(), 2);
        assert_eq!(window.button(0).unwrap().offset(), 5);
        assert_eq!(window.button(1).unwrap().offset(), -3);
        window.add_button(Button::new('d', ButtonAlignment::Left));
        assert_eq!(window.button(0).unwrap().offset(), 2);
        window.clear_buttons();
        assert!(window.button(0).is_none());
    }

    #[test]
    fn keys_and_focus_without_root() {
        let mut window = Window::new();
        window.set_rect(Rect::new(0, 0, 5, 5));
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        assert!(!window.handle_key(&key));
        window.focus();
        assert!(window.has_focus());
        window.blur();
        assert!(!window.has_focus());
        assert!(window.handle_mouse(MouseAction::LeftClick, &click(2, 2)).consumed);
        assert!(window.has_focus());
    }
}
