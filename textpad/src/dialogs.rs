//! Modal dialogs
//!
//! Every dialog blocks until dismissed and hands its answer straight back
//! to the caller.

use padcore::storage::{documents_dir, with_default_extension};
use std::path::PathBuf;

/// Answer to a three-way question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogResult {
    /// Yes / Save
    Confirm,
    /// No / Discard
    Reject,
    Cancel,
}

pub trait Dialogs {
    fn pick_open_path(&mut self) -> Option<PathBuf>;
    fn pick_save_path(&mut self) -> Option<PathBuf>;
    /// Save / Discard / Cancel before throwing away unsaved changes.
    fn ask_save_changes(&mut self) -> DialogResult;
    fn show_error(&mut self, message: &str);
    fn show_info(&mut self, title: &str, message: &str);
}

/// Platform file pickers and message boxes.
#[derive(Default)]
pub struct NativeDialogs;

impl NativeDialogs {
    fn file_dialog() -> rfd::FileDialog {
        rfd::FileDialog::new()
            .add_filter("Text Files", &["txt"])
            .add_filter("All Files", &["*"])
            .set_directory(documents_dir())
    }
}

impl Dialogs for NativeDialogs {
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        Self::file_dialog().set_title("Open").pick_file()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        Self::file_dialog()
            .set_title("Save As")
            .set_file_name("Untitled.txt")
            .save_file()
            .map(with_default_extension)
    }

    fn ask_save_changes(&mut self) -> DialogResult {
        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Unsaved Changes")
            .set_description("Save changes before proceeding?")
            .set_buttons(rfd::MessageButtons::YesNoCancel)
            .show();
        match answer {
            rfd::MessageDialogResult::Yes => DialogResult::Confirm,
            rfd::MessageDialogResult::No => DialogResult::Reject,
            _ => DialogResult::Cancel,
        }
    }

    fn show_error(&mut self, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Error")
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn show_info(&mut self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Answers dialogs from a script and records what was shown.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedDialogs {
    pub open_paths: std::collections::VecDeque<Option<PathBuf>>,
    pub save_paths: std::collections::VecDeque<Option<PathBuf>>,
    pub answers: std::collections::VecDeque<DialogResult>,
    pub file_dialogs_opened: usize,
    pub questions_asked: usize,
    pub errors: Vec<String>,
    pub infos: Vec<(String, String)>,
}

#[cfg(test)]
impl Dialogs for ScriptedDialogs {
    fn pick_open_path(&mut self) -> Option<PathBuf> {
        self.file_dialogs_opened += 1;
        self.open_paths.pop_front().flatten()
    }

    fn pick_save_path(&mut self) -> Option<PathBuf> {
        self.file_dialogs_opened += 1;
        self.save_paths.pop_front().flatten()
    }

    fn ask_save_changes(&mut self) -> DialogResult {
        self.questions_asked += 1;
        self.answers.pop_front().unwrap_or(DialogResult::Cancel)
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.infos.push((title.to_string(), message.to_string()));
    }
}
