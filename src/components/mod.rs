pub mod text_pane;

pub use text_pane::{TextFeed, TextPane};
