//! Storage utilities for textpad
//!
//! Whole-file UTF-8 reads and writes, plus the well-known directories.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension appended to save paths chosen without one.
pub const DEFAULT_EXTENSION: &str = "txt";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{} is not valid UTF-8 text", .path.display())]
    Encoding { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Read an entire file as UTF-8 text.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| StorageError::Encoding {
        path: path.to_path_buf(),
    })
}

/// Write `contents` to `path` exactly as given.
///
/// Symlinks are followed, so the file they point at receives the text. The
/// text is staged in a temporary file beside the target and persisted over
/// it, so the previous file stays intact if any step fails. An existing
/// file keeps its permissions.
pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let existing = std::fs::metadata(&target).ok().map(|m| m.permissions());
    let mut builder = tempfile::Builder::new();
    if existing.is_none() {
        if let Some(perms) = new_file_permissions() {
            builder.permissions(perms);
        }
    }

    let mut staged = builder.tempfile_in(&dir)?;
    staged.write_all(contents.as_bytes())?;
    staged.as_file().sync_all()?;
    if let Some(perms) = existing {
        staged.as_file().set_permissions(perms)?;
    }
    staged.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

/// Mode for a file created by a save, before the umask. Temporary files
/// would otherwise start out owner-only.
#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}

/// Give `path` the default `.txt` extension when it has none.
pub fn with_default_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(DEFAULT_EXTENSION);
    }
    path
}

/// Get the config directory for an app
pub fn config_dir(app_name: &str) -> PathBuf {
    directories::ProjectDirs::from("org", "textpad", app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the documents directory
pub fn documents_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
