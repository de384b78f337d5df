//! Document model for textpad
//!
//! Uses ropey for efficient handling of large text documents.

use ropey::Rope;

/// Maximum number of undo snapshots kept.
const UNDO_LIMIT: usize = 100;

/// The text buffer with its undo history
#[derive(Clone)]
pub struct Document {
    /// The text content using a rope data structure
    pub content: Rope,
    /// Set by every mutation, cleared by the observer
    changed: bool,
    /// Undo history
    undo_stack: Vec<UndoState>,
    /// Redo history
    redo_stack: Vec<UndoState>,
}

#[derive(Clone)]
struct UndoState {
    content: Rope,
    cursor_pos: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::from_string("")
    }

    pub fn from_string(text: &str) -> Self {
        Self {
            content: Rope::from_str(text),
            changed: false,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.content.to_string()
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    /// Replace the whole text and forget the history.
    pub fn reset(&mut self, text: &str) {
        self.content = Rope::from_str(text);
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.changed = true;
    }

    /// Save current state for undo
    pub fn save_undo_state(&mut self, cursor_pos: usize) {
        self.undo_stack.push(UndoState {
            content: self.content.clone(),
            cursor_pos,
        });
        // Clear redo stack on new edit
        self.redo_stack.clear();

        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }

    /// Undo last change, returning the cursor position to restore.
    pub fn undo(&mut self, cursor_pos: usize) -> Option<usize> {
        let state = self.undo_stack.pop()?;
        self.redo_stack.push(UndoState {
            content: self.content.clone(),
            cursor_pos,
        });
        self.content = state.content;
        self.changed = true;
        Some(state.cursor_pos.min(self.char_count()))
    }

    /// Redo last undone change, returning the cursor position to restore.
    pub fn redo(&mut self, cursor_pos: usize) -> Option<usize> {
        let state = self.redo_stack.pop()?;
        self.undo_stack.push(UndoState {
            content: self.content.clone(),
            cursor_pos,
        });
        self.content = state.content;
        self.changed = true;
        Some(state.cursor_pos.min(self.char_count()))
    }

    /// Insert text at position
    pub fn insert(&mut self, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = pos.min(self.content.len_chars());
        self.content.insert(pos, text);
        self.changed = true;
    }

    /// Delete character at position
    pub fn delete(&mut self, pos: usize) {
        if pos < self.content.len_chars() {
            self.content.remove(pos..pos + 1);
            self.changed = true;
        }
    }

    /// Delete range
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let start = start.min(self.content.len_chars());
        let end = end.min(self.content.len_chars());
        if start < end {
            self.content.remove(start..end);
            self.changed = true;
        }
    }

    /// Get text in range
    pub fn get_range(&self, start: usize, end: usize) -> String {
        let start = start.min(self.content.len_chars());
        let end = end.min(self.content.len_chars());
        if start >= end {
            return String::new();
        }
        self.content.slice(start..end).to_string()
    }

    pub fn line_count(&self) -> usize {
        self.content.len_lines()
    }

    pub fn char_count(&self) -> usize {
        self.content.len_chars()
    }

    /// Convert char index to 0-indexed line and column
    pub fn char_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let char_idx = char_idx.min(self.content.len_chars());
        let line = self.content.char_to_line(char_idx);
        let line_start = self.content.line_to_char(line);
        (line, char_idx - line_start)
    }

    /// Convert line and column to char index. The column is clamped to the
    /// line's length, excluding its line break.
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.content.len_lines().saturating_sub(1));
        let line_start = self.content.line_to_char(line);
        line_start + col.min(self.line_len(line))
    }

    /// Characters on a line, excluding its line break
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line(line_idx).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Content of a line without its line break
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx < self.content.len_lines() {
            let line = self.content.line(line_idx).to_string();
            Some(line.trim_end_matches(['\n', '\r']).to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.char_count(), 0);
        assert_eq!(doc.line_count(), 1);
        assert!(!doc.changed());
    }

    #[test]
    fn test_insert_and_delete() {
        let mut doc = Document::new();
        doc.insert(0, "Hello");
        assert_eq!(doc.text(), "Hello");
        assert!(doc.changed());

        doc.insert(5, " World");
        assert_eq!(doc.text(), "Hello World");

        doc.delete(5);
        assert_eq!(doc.text(), "HelloWorld");

        doc.delete_range(0, 5);
        assert_eq!(doc.text(), "World");
    }

    #[test]
    fn test_out_of_range_edits_are_ignored() {
        let mut doc = Document::from_string("abc");
        doc.delete(3);
        doc.delete_range(2, 2);
        doc.insert(1, "");
        assert_eq!(doc.text(), "abc");
        assert!(!doc.changed());
    }

    #[test]
    fn test_undo_redo() {
        let mut doc = Document::new();
        doc.insert(0, "Hello");
        doc.save_undo_state(5);
        doc.insert(5, " World");

        assert_eq!(doc.undo(11), Some(5));
        assert_eq!(doc.text(), "Hello");

        assert_eq!(doc.redo(5), Some(11));
        assert_eq!(doc.text(), "Hello World");
        assert!(doc.undo(11).is_some());
        assert!(doc.undo(5).is_none());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = Document::new();
        doc.save_undo_state(0);
        doc.insert(0, "a");
        doc.undo(1);
        doc.save_undo_state(0);
        doc.insert(0, "b");
        assert_eq!(doc.redo(1), None);
        assert_eq!(doc.text(), "b");
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut doc = Document::new();
        for i in 0..(UNDO_LIMIT + 20) {
            doc.save_undo_state(i);
            doc.insert(i, "x");
        }
        let mut undone = 0;
        while doc.undo(0).is_some() {
            undone += 1;
        }
        assert_eq!(undone, UNDO_LIMIT);
        assert_eq!(doc.char_count(), 20);
    }

    #[test]
    fn test_reset_drops_history() {
        let mut doc = Document::new();
        doc.save_undo_state(0);
        doc.insert(0, "draft");
        doc.reset("line1\nline2");
        assert_eq!(doc.text(), "line1\nline2");
        assert_eq!(doc.undo(0), None);
        assert_eq!(doc.redo(0), None);
        assert_eq!(doc.text(), "line1\nline2");
    }

    #[test]
    fn test_line_col_mapping() {
        let doc = Document::from_string("line1\nline2");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.char_to_line_col(0), (0, 0));
        assert_eq!(doc.char_to_line_col(5), (0, 5));
        assert_eq!(doc.char_to_line_col(6), (1, 0));
        assert_eq!(doc.char_to_line_col(11), (1, 5));
        assert_eq!(doc.line_col_to_char(1, 5), 11);
        // past the end of a line clamps before its break
        assert_eq!(doc.line_col_to_char(0, 99), 5);
        assert_eq!(doc.line(0).as_deref(), Some("line1"));
        assert_eq!(doc.line(2), None);
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let doc = Document::from_string("a\n");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.char_to_line_col(2), (1, 0));
        assert_eq!(doc.line(1).as_deref(), Some(""));
    }

    #[test]
    fn test_only_newlines_break_lines() {
        for text in ["ab\u{000C}cd", "a\rb", "x\u{000B}y", "p\u{0085}q", "s\u{2028}t"] {
            let doc = Document::from_string(text);
            let len = text.chars().count();
            assert_eq!(doc.line_count(), 1, "{:?}", text);
            assert_eq!(doc.char_to_line_col(len), (0, len), "{:?}", text);
            assert_eq!(doc.line_len(0), len, "{:?}", text);
        }
        let doc = Document::from_string("one\r\ntwo");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line(0).as_deref(), Some("one"));
        assert_eq!(doc.line_col_to_char(0, 99), 3);
    }
}
