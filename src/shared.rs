//! Shared ownership of a region.
//!
//! A window can sit in the layout tree and be the maximized root of a
//! [`crate::Manager`] at the same time. [`Shared`] gives both owners a handle
//! to the same region, and forwards the [`Region`] contract through a lock so
//! either owner can drive it.
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::input::MouseAction;
use crate::region::{MouseOutcome, Region};
use crate::surface::Surface;

pub struct Shared<R> {
    inner: Arc<Mutex<R>>,
}

impl<R> Shared<R> {
    pub fn new(region: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(region)),
        }
    }

    /// Lock the region. A poisoned lock is recovered: geometry state stays
    /// usable after a panic on another thread.
    pub fn lock(&self) -> MutexGuard<'_, R> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering poisoned region lock");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Whether both handles point at the same region.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A handle that does not keep the region alive, for callbacks stored
    /// inside the region itself.
    pub fn downgrade(&self) -> WeakShared<R> {
        WeakShared {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<R> Clone for Shared<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> From<R> for Shared<R> {
    fn from(region: R) -> Self {
        Self::new(region)
    }
}

impl<R> fmt::Debug for Shared<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("ptr", &Arc::as_ptr(&self.inner))
            .finish()
    }
}

pub struct WeakShared<R> {
    inner: Weak<Mutex<R>>,
}

impl<R> WeakShared<R> {
    pub fn upgrade(&self) -> Option<Shared<R>> {
        self.inner.upgrade().map(|inner| Shared { inner })
    }
}

impl<R> Clone for WeakShared<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<R: Region> Region for Shared<R> {
    fn rect(&self) -> Rect {
        self.lock().rect()
    }

    fn set_rect(&mut self, rect: Rect) {
        self.lock().set_rect(rect)
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        self.lock().draw(surface)
    }

    fn focus(&mut self) {
        self.lock().focus()
    }

    fn has_focus(&self) -> bool {
        self.lock().has_focus()
    }

    fn blur(&mut self) {
        self.lock().blur()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        self.lock().handle_key(key)
    }

    fn handle_mouse(&mut self, action: MouseAction, event: &MouseEvent) -> MouseOutcome {
        self.lock().handle_mouse(action, event)
    }
}
