//! Atomic file replacement.
//!
//! Content is written to a hidden sibling temp file, synced, then renamed
//! over the target. Readers see either the old file or the new one, never a
//! partial write. A temp file that is never committed is deleted on drop.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{TranslationError, TranslationResult};

/// Prefix of in-flight temp files in the language directory.
pub(crate) const TEMP_PREFIX: &str = ".wplang-";

/// Mode for new translation files.
#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

/// Write `content` to a temp file next to `target`.
///
/// The returned handle must be passed to [`commit`]; dropping it instead
/// leaves `target` untouched.
pub(crate) fn stage_write(target: &Path, content: &[u8]) -> TranslationResult<NamedTempFile> {
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| TranslationError::filesystem(parent, e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| TranslationError::filesystem(parent, e))?;

    temp.write_all(content)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| TranslationError::filesystem(temp.path(), e))?;

    apply_permissions(&temp, target)?;
    Ok(temp)
}

/// Atomically move a staged temp file onto `target`.
pub(crate) fn commit(temp: NamedTempFile, target: &Path) -> TranslationResult<()> {
    temp.persist(target)
        .map_err(|e| TranslationError::filesystem(target, e.error))?;
    Ok(())
}

/// Replace `target` with `content` atomically.
pub(crate) fn write_atomic(target: &Path, content: &[u8]) -> TranslationResult<()> {
    let temp = stage_write(target, content)?;
    commit(temp, target)
}

/// Keep the existing file's permissions; new files get a world-readable mode.
fn apply_permissions(temp: &NamedTempFile, target: &Path) -> TranslationResult<()> {
    let permissions = match fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => default_permissions(temp)?,
    };
    fs::set_permissions(temp.path(), permissions)
        .map_err(|e| TranslationError::filesystem(temp.path(), e))
}

#[cfg(unix)]
fn default_permissions(_temp: &NamedTempFile) -> TranslationResult<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(DEFAULT_MODE))
}

#[cfg(not(unix))]
fn default_permissions(temp: &NamedTempFile) -> TranslationResult<fs::Permissions> {
    temp.as_file()
        .metadata()
        .map(|m| m.permissions())
        .map_err(|e| TranslationError::filesystem(temp.path(), e))
}
