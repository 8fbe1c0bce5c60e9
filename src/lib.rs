//! Splitter-based tiling layouts and titled windows for terminal UIs.
//!
//! A [`Manager`] sits at the root and shows either its logical [`Layout`] tree
//! or one maximized [`Window`]. Layouts arrange [`Region`]s along an axis with
//! draggable splitters; windows wrap one region in a title rule with buttons.
//! Everything draws through the [`Surface`] trait, which a ratatui
//! [`ratatui::buffer::Buffer`] implements.

pub mod clip;
pub mod components;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod layout;
pub mod manager;
pub mod region;
pub mod shared;
pub mod surface;
pub mod theme;
pub mod tracing_sub;
pub mod window;

pub use clip::ClipRegion;
pub use error::LayoutError;
pub use input::{ClickTracker, MouseAction};
pub use layout::{AUTO_SIZE, Item, Layout, Splitter};
pub use manager::{Manager, ManagerCommand, ManagerCommands};
pub use region::{MouseOutcome, Region};
pub use shared::{Shared, WeakShared};
pub use surface::Surface;
pub use window::{Button, ButtonAlignment, Window, WindowHandle};
