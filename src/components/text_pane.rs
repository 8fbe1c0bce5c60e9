use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossterm::event::MouseEvent;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;

use crate::input::MouseAction;
use crate::region::{MouseOutcome, Region};
use crate::surface::{Surface, print};

const DEFAULT_MAX_LINES: usize = 2000;

#[derive(Debug)]
struct FeedBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
    generation: u64,
}

impl FeedBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
            generation: 0,
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
        self.generation += 1;
    }
}

/// Cloneable handle to the lines shown by a [`TextPane`]. Producer threads
/// append through it while the render loop draws.
#[derive(Clone, Debug)]
pub struct TextFeed {
    inner: Arc<Mutex<FeedBuffer>>,
}

impl Default for TextFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFeed {
    pub fn new() -> Self {
        Self::with_max_lines(DEFAULT_MAX_LINES)
    }

    /// Keep at most `max_lines`, dropping the oldest first.
    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedBuffer::new(max_lines))),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, FeedBuffer> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_line(&self, line: impl Into<String>) {
        self.buffer().push_line(line.into());
    }

    /// Append `word` to the last line, separated by a space.
    pub fn push_word(&self, word: &str) {
        let mut guard = self.buffer();
        let buffer = &mut *guard;
        match buffer.lines.back_mut() {
            Some(last) => {
                if !last.is_empty() {
                    last.push(' ');
                }
                last.push_str(word);
                buffer.generation += 1;
            }
            None => buffer.push_line(word.to_string()),
        }
    }

    pub fn clear(&self) {
        let mut buffer = self.buffer();
        buffer.lines.clear();
        buffer.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.buffer().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer().lines.is_empty()
    }

    /// Bumped on every change; lets a host skip redraws when nothing moved.
    pub fn generation(&self) -> u64 {
        self.buffer().generation
    }

    /// The last `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let buffer = self.buffer();
        let skip = buffer.lines.len().saturating_sub(count);
        buffer.lines.iter().skip(skip).cloned().collect()
    }
}

/// Focusable region that shows the tail of a [`TextFeed`], one line per row.
/// Lines wider than the pane are cut at its right edge.
#[derive(Debug)]
pub struct TextPane {
    rect: Rect,
    feed: TextFeed,
    style: Style,
    focused: bool,
}

impl TextPane {
    pub fn new(feed: TextFeed) -> Self {
        Self {
            rect: Rect::default(),
            feed,
            style: Style::default(),
            focused: false,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn feed(&self) -> &TextFeed {
        &self.feed
    }
}

impl Region for TextPane {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let rows = self.rect.height as usize;
        for (offset, line) in self.feed.tail(rows).iter().enumerate() {
            print(
                surface,
                line,
                self.rect.x,
                self.rect.y + offset as u16,
                self.rect.width,
                Alignment::Left,
                self.style,
            );
        }
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

    fn handle_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        if action == MouseAction::LeftClick && self.in_rect(event.column, event.row) {
            self.focused = true;
            return MouseOutcome::CONSUMED;
        }
        MouseOutcome::IGNORED
    }
}
