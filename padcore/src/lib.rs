//! padcore: shared library for the textpad editor

pub mod config;
pub mod logging;
pub mod storage;
pub mod theme;
pub mod widgets;

pub use config::EditorConfig;
pub use theme::{Palette, PadTheme, Theme};
