//! Editor shell
//!
//! Owns the session state and wires every command to the editing surface,
//! the dialogs and the file system. Menus, toolbar and keyboard all end up
//! in `EditorShell::execute`.

use crate::commands::Command;
use crate::dialogs::{DialogResult, Dialogs};
use crate::session::{Caret, FontSize, SessionState};
use crate::surface::TextEditingSurface;
use padcore::storage::{self, StorageError};
use padcore::Theme;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("unsupported font size {0}")]
    UnsupportedFontSize(u32),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct EditorShell<S, D> {
    surface: S,
    dialogs: D,
    state: SessionState,
    status: String,
    /// Show a message box after every successful save.
    confirm_saves: bool,
    exit_requested: bool,
}

impl<S: TextEditingSurface, D: Dialogs> EditorShell<S, D> {
    pub fn new(surface: S, dialogs: D) -> Self {
        let mut shell = Self {
            surface,
            dialogs,
            state: SessionState::default(),
            status: Caret::START.status_text(),
            confirm_saves: true,
            exit_requested: false,
        };
        shell.surface.set_edit_modified(false);
        shell.update_status();
        shell
    }

    pub fn with_save_confirmation(mut self, confirm_saves: bool) -> Self {
        self.confirm_saves = confirm_saves;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[cfg(test)]
    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn window_title(&self) -> String {
        self.state.window_title()
    }

    /// Set once the user has confirmed leaving.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn execute(&mut self, command: Command) {
        log::debug!("execute {:?}", command);
        match command {
            Command::New => self.new_file(),
            Command::Open => self.open_file(),
            Command::Save => {
                self.save_file();
            }
            Command::SaveAs => {
                self.save_as();
            }
            Command::Exit => {
                self.exit_editor();
            }
            Command::Bold => self.toggle_bold(),
            Command::Italic => self.toggle_italic(),
            Command::SetFontSize(size) => {
                if let Err(e) = self.set_font_size(size.points()) {
                    log::warn!("{}", e);
                }
            }
            Command::SetTheme(theme) => self.set_theme(theme),
            Command::ToggleTheme => self.toggle_theme(),
            Command::Undo => self.surface.undo(),
            Command::Redo => self.surface.redo(),
            Command::Cut => self.surface.cut(),
            Command::Copy => self.surface.copy(),
            Command::Paste => self.surface.paste(),
            Command::SelectAll => self.surface.select_all(),
        }
        self.sync();
    }

    /// Insert text delivered by a platform paste.
    pub fn paste_text(&mut self, text: &str) {
        self.surface.insert(text);
        self.sync();
    }

    // ---------------------------------------------------------------
    // File operations
    // ---------------------------------------------------------------

    pub fn new_file(&mut self) {
        if !self.confirm_discard() {
            return;
        }
        self.load_buffer("", None);
        log::info!("new document");
    }

    pub fn open_file(&mut self) {
        if !self.confirm_discard() {
            return;
        }
        let Some(path) = self.dialogs.pick_open_path() else {
            return;
        };
        match read_buffer(&path) {
            Ok(text) => {
                log::info!("opened {}", path.display());
                self.load_buffer(&text, Some(path));
            }
            Err(e) => {
                log::warn!("failed to open {}: {}", path.display(), e);
                self.dialogs.show_error(&e.to_string());
            }
        }
    }

    /// Returns whether the buffer reached disk.
    pub fn save_file(&mut self) -> bool {
        match self.state.file_path.clone() {
            Some(path) => self.write_to(&path),
            None => self.save_as(),
        }
    }

    /// Returns whether the buffer reached disk.
    pub fn save_as(&mut self) -> bool {
        let Some(path) = self.dialogs.pick_save_path() else {
            return false;
        };
        if !self.write_to(&path) {
            return false;
        }
        self.state.file_path = Some(path);
        true
    }

    /// Returns whether the editor is going to close.
    pub fn exit_editor(&mut self) -> bool {
        if !self.confirm_discard() {
            return false;
        }
        log::info!("exiting");
        self.exit_requested = true;
        true
    }

    /// Ask before dropping unsaved changes. `false` means the caller must
    /// abort.
    pub fn confirm_discard(&mut self) -> bool {
        self.sync();
        if !self.state.modified {
            return true;
        }
        match self.dialogs.ask_save_changes() {
            DialogResult::Confirm => {
                if !self.save_file() {
                    log::warn!("proceeding without a completed save");
                }
                true
            }
            DialogResult::Reject => true,
            DialogResult::Cancel => false,
        }
    }

    fn load_buffer(&mut self, text: &str, path: Option<PathBuf>) {
        self.surface.set_content(text);
        self.surface.set_edit_modified(false);
        self.state.file_path = path;
        self.state.modified = false;
        self.update_status();
    }

    fn write_to(&mut self, path: &Path) -> bool {
        self.sync();
        let contents = self.surface.content();
        match storage::write_text_file(path, &contents) {
            Ok(()) => {
                log::info!("saved {} ({} bytes)", path.display(), contents.len());
                self.state.modified = false;
                if self.confirm_saves {
                    self.dialogs.show_info("Saved", "File saved successfully");
                }
                true
            }
            Err(e) => {
                log::warn!("failed to save {}: {}", path.display(), e);
                self.dialogs.show_error(&e.to_string());
                false
            }
        }
    }

    // ---------------------------------------------------------------
    // Formatting and theme
    // ---------------------------------------------------------------

    pub fn toggle_bold(&mut self) {
        self.state.font.bold = !self.state.font.bold;
    }

    pub fn toggle_italic(&mut self) {
        self.state.font.italic = !self.state.font.italic;
    }

    /// Only the sizes offered by the Font Size menu are accepted.
    pub fn set_font_size(&mut self, points: u32) -> Result<(), ShellError> {
        let size = FontSize::new(points).ok_or(ShellError::UnsupportedFontSize(points))?;
        self.state.font.size = size;
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.state.theme.toggled());
    }

    // ---------------------------------------------------------------
    // Change tracking
    // ---------------------------------------------------------------

    /// Fold the surface's change flag into the session and refresh the
    /// status bar. Runs after the surface has seen input.
    pub fn sync(&mut self) {
        if self.surface.edit_modified() {
            self.state.modified = true;
        }
        self.update_status();
    }

    pub fn update_status(&mut self) {
        self.status = self.surface.caret().status_text();
        self.surface.set_edit_modified(false);
    }
}

fn read_buffer(path: &Path) -> Result<String, ShellError> {
    Ok(storage::read_text_file(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::ScriptedDialogs;
    use crate::editor::{Clipboard, EditorSurface};

    type TestShell = EditorShell<EditorSurface, ScriptedDialogs>;

    fn shell() -> TestShell {
        EditorShell::new(EditorSurface::new(Clipboard::internal()), ScriptedDialogs::default())
    }

    fn type_text(shell: &mut TestShell, text: &str) {
        shell.surface_mut().insert(text);
        shell.sync();
    }

    fn script_save(shell: &mut TestShell, path: Option<PathBuf>) {
        shell.dialogs.save_paths.push_back(path);
    }

    fn script_open(shell: &mut TestShell, path: Option<PathBuf>) {
        shell.dialogs.open_paths.push_back(path);
    }

    #[test]
    fn test_fresh_launch() {
        let shell = shell();
        assert_eq!(shell.window_title(), "Untitled - Text Editor");
        assert_eq!(shell.status_text(), "Ln 1, Col 1");
        assert_eq!(shell.state().file_path, None);
        assert!(!shell.state().modified);
    }

    #[test]
    fn test_typing_marks_modified() {
        let mut shell = shell();
        type_text(&mut shell, "hello");
        assert_eq!(shell.surface().content(), "hello");
        assert!(shell.state().modified);
        assert_eq!(shell.status_text(), "Ln 1, Col 6");
        // widget flag is reset so the next edit is seen again
        assert!(!shell.surface().edit_modified());
    }

    #[test]
    fn test_status_follows_lines() {
        let mut shell = shell();
        type_text(&mut shell, "one\ntwo\nth");
        assert_eq!(shell.status_text(), "Ln 3, Col 3");
    }

    #[test]
    fn test_save_as_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut shell = shell();
        type_text(&mut shell, "hello");
        script_save(&mut shell, Some(path.clone()));

        assert!(shell.save_as());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(shell.window_title(), format!("{} - Text Editor", path.display()));
        assert!(!shell.state().modified);
        assert_eq!(
            shell.dialogs().infos,
            vec![("Saved".to_string(), "File saved successfully".to_string())]
        );
    }

    #[test]
    fn test_save_without_path_delegates_to_save_as() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.txt");
        let mut shell = shell();
        type_text(&mut shell, "text");
        script_save(&mut shell, Some(path.clone()));

        shell.execute(Command::Save);
        assert_eq!(shell.dialogs().file_dialogs_opened, 1);
        assert_eq!(shell.state().file_path, Some(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "text");
    }

    #[test]
    fn test_cancelled_save_as_changes_nothing() {
        let mut shell = shell();
        type_text(&mut shell, "keep");
        script_save(&mut shell, None);

        assert!(!shell.save_as());
        assert_eq!(shell.state().file_path, None);
        assert!(shell.state().modified);
        assert!(shell.dialogs().infos.is_empty());
    }

    #[test]
    fn test_save_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.txt");
        let mut shell = shell();
        type_text(&mut shell, "same");
        script_save(&mut shell, Some(path.clone()));
        assert!(shell.save_as());

        for _ in 0..2 {
            assert!(shell.save_file());
            assert_eq!(std::fs::read_to_string(&path).unwrap(), "same");
            assert_eq!(shell.state().file_path, Some(path.clone()));
        }
        // only the first save asked for a path
        assert_eq!(shell.dialogs().file_dialogs_opened, 1);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for (name, text) in [
            ("empty.txt", ""),
            ("plain.txt", "line1\nline2"),
            ("unicode.txt", "héllo wörld ✓\n日本語\n"),
            ("crlf.txt", "a\r\nb\r\n"),
        ] {
            let path = dir.path().join(name);
            let mut writer = shell();
            writer.surface_mut().set_content(text);
            script_save(&mut writer, Some(path.clone()));
            assert!(writer.save_as());

            let mut reader = shell();
            script_open(&mut reader, Some(path.clone()));
            reader.open_file();
            assert_eq!(reader.surface().content(), text, "{}", name);
        }
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "line1\nline2").unwrap();
        let mut shell = shell();
        script_open(&mut shell, Some(path.clone()));

        shell.execute(Command::Open);
        assert_eq!(shell.surface().content(), "line1\nline2");
        assert_eq!(shell.window_title(), format!("{} - Text Editor", path.display()));
        assert!(!shell.state().modified);
        assert_eq!(shell.status_text(), "Ln 1, Col 1");
    }

    #[test]
    fn test_failed_open_keeps_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell();
        type_text(&mut shell, "draft");
        shell.dialogs.answers.push_back(DialogResult::Reject);
        script_open(&mut shell, Some(dir.path().join("missing.txt")));

        shell.open_file();
        assert_eq!(shell.surface().content(), "draft");
        assert_eq!(shell.state().file_path, None);
        assert!(shell.state().modified);
        assert_eq!(shell.dialogs().errors.len(), 1);
    }

    #[test]
    fn test_open_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let mut shell = shell();
        script_open(&mut shell, Some(path));

        shell.open_file();
        assert_eq!(shell.surface().content(), "");
        assert_eq!(shell.state().file_path, None);
        assert_eq!(shell.dialogs().errors.len(), 1);
        assert!(shell.dialogs().errors[0].contains("UTF-8"));
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("inner.txt"), "x").unwrap();
        let mut shell = shell();
        type_text(&mut shell, "unsaved");
        script_save(&mut shell, Some(target.clone()));

        assert!(!shell.save_as());
        assert_eq!(shell.state().file_path, None);
        assert!(shell.state().modified);
        assert_eq!(shell.dialogs().errors.len(), 1);
        assert!(target.is_dir());
    }

    #[test]
    fn test_cancel_discard_aborts_new() {
        let mut shell = shell();
        type_text(&mut shell, "work");
        shell.dialogs.answers.push_back(DialogResult::Cancel);

        shell.execute(Command::New);
        assert_eq!(shell.surface().content(), "work");
        assert!(shell.state().modified);
        assert_eq!(shell.window_title(), "Untitled - Text Editor");
        assert_eq!(shell.dialogs().questions_asked, 1);
    }

    #[test]
    fn test_cancel_discard_aborts_open_without_picker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        let mut shell = shell();
        type_text(&mut shell, "hello");
        script_save(&mut shell, Some(path.clone()));
        shell.save_as();
        type_text(&mut shell, " more");
        shell.dialogs.answers.push_back(DialogResult::Cancel);
        let opened_before = shell.dialogs().file_dialogs_opened;

        shell.open_file();
        assert_eq!(shell.dialogs().file_dialogs_opened, opened_before);
        assert_eq!(shell.surface().content(), "hello more");
        assert_eq!(shell.state().file_path, Some(path));
        assert!(shell.state().modified);
    }

    #[test]
    fn test_cancel_discard_aborts_exit() {
        let mut shell = shell();
        type_text(&mut shell, "stay");
        shell.dialogs.answers.push_back(DialogResult::Cancel);

        assert!(!shell.exit_editor());
        assert!(!shell.exit_requested());
        assert!(shell.state().modified);
    }

    #[test]
    fn test_discard_proceeds_without_saving() {
        let mut shell = shell();
        type_text(&mut shell, "throwaway");
        shell.dialogs.answers.push_back(DialogResult::Reject);

        shell.new_file();
        assert_eq!(shell.surface().content(), "");
        assert!(!shell.state().modified);
        assert_eq!(shell.dialogs().file_dialogs_opened, 0);
    }

    #[test]
    fn test_save_answer_saves_then_proceeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kept.txt");
        let mut shell = shell();
        type_text(&mut shell, "kept");
        shell.dialogs.answers.push_back(DialogResult::Confirm);
        script_save(&mut shell, Some(path.clone()));

        assert!(shell.exit_editor());
        assert!(shell.exit_requested());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept");
    }

    #[test]
    fn test_save_answer_proceeds_after_cancelled_picker() {
        let mut shell = shell();
        type_text(&mut shell, "draft");
        shell.dialogs.answers.push_back(DialogResult::Confirm);
        script_save(&mut shell, None);

        assert!(shell.confirm_discard());
        assert_eq!(shell.dialogs().file_dialogs_opened, 1);
        shell.dialogs.answers.push_back(DialogResult::Confirm);
        script_save(&mut shell, None);
        shell.new_file();
        assert_eq!(shell.surface().content(), "");
        assert!(!shell.state().modified);
    }

    #[test]
    fn test_clean_buffer_skips_question() {
        let mut shell = shell();
        assert!(shell.exit_editor());
        assert_eq!(shell.dialogs().questions_asked, 0);
    }

    #[test]
    fn test_new_file_resets_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "abc").unwrap();
        let mut shell = shell();
        script_open(&mut shell, Some(path));
        shell.open_file();

        shell.new_file();
        assert_eq!(shell.window_title(), "Untitled - Text Editor");
        assert_eq!(shell.surface().content(), "");
        assert!(!shell.state().modified);
    }

    #[test]
    fn test_save_confirmation_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell().with_save_confirmation(false);
        type_text(&mut shell, "quiet");
        script_save(&mut shell, Some(dir.path().join("q.txt")));

        assert!(shell.save_as());
        assert!(shell.dialogs().infos.is_empty());
    }

    #[test]
    fn test_toggle_bold_twice() {
        let mut shell = shell();
        type_text(&mut shell, "text");
        let before = shell.state().font;
        shell.execute(Command::Bold);
        assert!(shell.state().font.bold);
        shell.execute(Command::Bold);
        assert_eq!(shell.state().font, before);
        assert_eq!(shell.surface().content(), "text");
    }

    #[test]
    fn test_toggle_italic() {
        let mut shell = shell();
        shell.toggle_italic();
        assert!(shell.state().font.italic);
        assert!(!shell.state().font.bold);
        assert!(!shell.state().modified);
    }

    #[test]
    fn test_set_font_size() {
        let mut shell = shell();
        shell.toggle_bold();
        for size in FontSize::ALL {
            shell.set_font_size(size.points()).unwrap();
            assert_eq!(shell.state().font.size, size);
            assert!(shell.state().font.bold);
            assert!(!shell.state().font.italic);
        }
    }

    #[test]
    fn test_font_size_command() {
        let mut shell = shell();
        for size in FontSize::ALL {
            shell.execute(Command::SetFontSize(size));
            assert_eq!(shell.state().font.size, size);
        }
        assert!(!shell.state().modified);
    }

    #[test]
    fn test_unsupported_font_size() {
        let mut shell = shell();
        let before = shell.state().font;
        for bad in [7, 9, 15, 30] {
            let err = shell.set_font_size(bad).unwrap_err();
            assert!(matches!(err, ShellError::UnsupportedFontSize(s) if s == bad));
        }
        assert_eq!(shell.state().font, before);
    }

    #[test]
    fn test_theme_toggle_twice() {
        let mut shell = shell();
        let before = shell.state().theme.palette();
        shell.execute(Command::ToggleTheme);
        assert_eq!(shell.state().theme, Theme::Dark);
        shell.execute(Command::ToggleTheme);
        assert_eq!(shell.state().theme.palette(), before);
    }

    #[test]
    fn test_theme_by_name() {
        let mut shell = shell();
        shell.set_theme(Theme::from_name("dark"));
        assert_eq!(shell.state().theme, Theme::Dark);
        shell.set_theme(Theme::from_name("sepia"));
        assert_eq!(shell.state().theme, Theme::Light);
    }

    #[test]
    fn test_edit_commands_mark_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell();
        type_text(&mut shell, "abc");
        script_save(&mut shell, Some(dir.path().join("e.txt")));
        shell.save_as();
        assert!(!shell.state().modified);

        shell.execute(Command::Undo);
        assert!(shell.state().modified);
        assert_eq!(shell.surface().content(), "");
    }

    #[test]
    fn test_cut_and_paste() {
        let mut shell = shell();
        type_text(&mut shell, "hello");
        shell.execute(Command::SelectAll);
        shell.execute(Command::Cut);
        assert_eq!(shell.surface().content(), "");
        shell.execute(Command::Paste);
        shell.execute(Command::Paste);
        assert_eq!(shell.surface().content(), "hellohello");
        assert_eq!(shell.status_text(), "Ln 1, Col 11");
    }

    #[test]
    fn test_status_follows_caret_moves() {
        let mut shell = shell();
        type_text(&mut shell, "hello\nworld");
        assert_eq!(shell.status_text(), "Ln 2, Col 6");

        shell.surface_mut().move_left(false);
        shell.sync();
        assert_eq!(shell.status_text(), "Ln 2, Col 5");

        shell.surface_mut().move_up(false);
        shell.sync();
        assert_eq!(shell.status_text(), "Ln 1, Col 5");

        shell.surface_mut().move_to_line_start(false);
        shell.sync();
        assert_eq!(shell.status_text(), "Ln 1, Col 1");

        shell.execute(Command::SelectAll);
        assert_eq!(shell.status_text(), "Ln 2, Col 6");
        assert_eq!(shell.surface().content(), "hello\nworld");
    }

    #[test]
    fn test_platform_paste() {
        let mut shell = shell();
        shell.paste_text("from\nclipboard");
        assert_eq!(shell.surface().content(), "from\nclipboard");
        assert!(shell.state().modified);
        assert_eq!(shell.status_text(), "Ln 2, Col 10");
    }
}
