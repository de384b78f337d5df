//! The editing capability the shell drives.
//!
//! The shell never edits text itself. Primitive edits, clipboard, selection
//! and undo history all belong to whatever widget implements this trait.

use crate::session::Caret;

pub trait TextEditingSurface {
    /// Insert at the caret, replacing the selection if there is one.
    fn insert(&mut self, text: &str);
    /// Delete the selection, or the character before the caret.
    fn delete(&mut self);
    fn content(&self) -> String;
    /// Replace the whole text. Caret goes to the start; selection and
    /// undo history are dropped.
    fn set_content(&mut self, text: &str);

    fn undo(&mut self);
    fn redo(&mut self);
    fn cut(&mut self);
    fn copy(&mut self);
    fn paste(&mut self);
    fn select_all(&mut self);

    fn caret(&self) -> Caret;

    /// Change notification flag, set by every content mutation.
    fn edit_modified(&self) -> bool;
    fn set_edit_modified(&mut self, modified: bool);
}
