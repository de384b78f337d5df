//! Session state for the editor
//!
//! Created with defaults at start, mutated by the shell's handlers and
//! dropped on exit. Nothing here is ever written to disk.

use padcore::Theme;
use std::fmt;
use std::path::PathBuf;

pub const APP_TITLE: &str = "Text Editor";
pub const UNTITLED: &str = "Untitled";

/// A point size offered by the Font Size menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u8);

impl FontSize {
    /// Even sizes from 8 to 28 inclusive.
    pub const ALL: [FontSize; 11] = [
        FontSize(8),
        FontSize(10),
        FontSize(12),
        FontSize(14),
        FontSize(16),
        FontSize(18),
        FontSize(20),
        FontSize(22),
        FontSize(24),
        FontSize(26),
        FontSize(28),
    ];

    pub const DEFAULT: FontSize = FontSize(14);

    pub fn new(points: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| u32::from(s.0) == points)
    }

    pub fn points(self) -> u32 {
        u32::from(self.0)
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whole-buffer font style. Visual only, never saved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontAttributes {
    pub bold: bool,
    pub italic: bool,
    pub size: FontSize,
}

/// Caret position: 1-indexed row, 0-indexed column in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caret {
    pub row: usize,
    pub column: usize,
}

impl Caret {
    pub const START: Caret = Caret { row: 1, column: 0 };

    /// Status bar text, with the column shown 1-indexed.
    pub fn status_text(self) -> String {
        format!("Ln {}, Col {}", self.row, self.column + 1)
    }
}

impl Default for Caret {
    fn default() -> Self {
        Self::START
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    /// `None` until the first successful open or save-as.
    pub file_path: Option<PathBuf>,
    pub theme: Theme,
    pub font: FontAttributes,
    /// Unsaved changes exist.
    pub modified: bool,
}

impl SessionState {
    pub fn window_title(&self) -> String {
        match &self.file_path {
            Some(path) => format!("{} - {}", path.display(), APP_TITLE),
            None => format!("{} - {}", UNTITLED, APP_TITLE),
        }
    }
}
