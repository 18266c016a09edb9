//! Reconciliation of staged language packs with the language directory.
//!
//! For every staged file:
//! - identical bytes on disk: left alone
//! - different or missing: replaced atomically (see `atomic`)
//!
//! Files the new pack no longer ships are kept unless the reconciler is
//! built with [`ObsoletePolicy::Remove`]; removal is limited to files owned
//! by the [`LocaleScope`] being reconciled.

mod atomic;
mod scope;

use std::fs;
use std::io;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{TranslationError, TranslationResult};
use crate::fetch::StagedFileSet;

pub use scope::LocaleScope;

/// Handling of destination files absent from the staged set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObsoletePolicy {
    /// Leave them in place.
    #[default]
    Keep,
    /// Delete them.
    Remove,
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Files created or overwritten.
    pub written: usize,
    /// Files already up to date.
    pub unchanged: usize,
    /// Obsolete files deleted.
    pub removed: usize,
}

impl ReconcileOutcome {
    /// Whether the pass changed anything on disk.
    pub fn updated(&self) -> bool {
        self.written > 0 || self.removed > 0
    }
}

/// Applies staged files to a destination directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    obsolete: ObsoletePolicy,
}

impl Reconciler {
    pub fn new(obsolete: ObsoletePolicy) -> Self {
        Self { obsolete }
    }

    /// Reconcile `staged` into `dest_dir`; true if anything changed.
    pub fn reconcile(
        &self,
        staged: StagedFileSet,
        dest_dir: &Path,
        scope: &LocaleScope,
        cancel: &CancellationToken,
    ) -> TranslationResult<bool> {
        self.reconcile_detailed(staged, dest_dir, scope, cancel)
            .map(|outcome| outcome.updated())
    }

    /// Like [`reconcile`](Self::reconcile), returning per-file counts.
    ///
    /// Cancellation is checked before every write or removal. Files already
    /// committed stay committed.
    pub fn reconcile_detailed(
        &self,
        staged: StagedFileSet,
        dest_dir: &Path,
        scope: &LocaleScope,
        cancel: &CancellationToken,
    ) -> TranslationResult<ReconcileOutcome> {
        fs::create_dir_all(dest_dir).map_err(|e| TranslationError::filesystem(dest_dir, e))?;

        let mut outcome = ReconcileOutcome::default();

        for (relative, content) in staged.iter() {
            if cancel.is_cancelled() {
                return Err(TranslationError::Cancelled);
            }

            let target = dest_dir.join(relative);
            if content_matches(&target, content)? {
                trace!(path = %target.display(), "Translation file unchanged");
                outcome.unchanged += 1;
                continue;
            }

            atomic::write_atomic(&target, content)?;
            debug!(path = %target.display(), bytes = content.len(), "Wrote translation file");
            outcome.written += 1;
        }

        if self.obsolete == ObsoletePolicy::Remove {
            outcome.removed = remove_obsolete(&staged, dest_dir, scope, cancel)?;
        }

        Ok(outcome)
    }
}

/// Compare `content` with the file at `path`. A missing file never matches.
fn content_matches(path: &Path, content: &[u8]) -> TranslationResult<bool> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_file() || meta.len() != content.len() as u64 => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(TranslationError::filesystem(path, e)),
    }

    let existing = fs::read(path).map_err(|e| TranslationError::filesystem(path, e))?;
    Ok(existing == content)
}

/// Delete scope-owned files in `dest_dir` that `staged` does not contain.
fn remove_obsolete(
    staged: &StagedFileSet,
    dest_dir: &Path,
    scope: &LocaleScope,
    cancel: &CancellationToken,
) -> TranslationResult<usize> {
    let entries = fs::read_dir(dest_dir).map_err(|e| TranslationError::filesystem(dest_dir, e))?;
    let mut removed = 0;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with(atomic::TEMP_PREFIX) || !scope.owns(name) {
            continue;
        }
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if staged.contains(Path::new(name)) {
            continue;
        }
        if cancel.is_cancelled() {
            return Err(TranslationError::Cancelled);
        }

        let path = entry.path();
        fs::remove_file(&path).map_err(|e| TranslationError::filesystem(&path, e))?;
        debug!(path = %path.display(), "Removed obsolete translation file");
        removed += 1;
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PackageKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn plugin_scope() -> LocaleScope {
        LocaleScope::new(PackageKind::Plugin, "akismet", "fr_FR")
    }

    fn pack() -> StagedFileSet {
        [
            ("akismet-fr_FR.po", b"msgid \"Hello\"\nmsgstr \"Bonjour\"\n".to_vec()),
            ("akismet-fr_FR.mo", vec![0xde, 0x12, 0x04, 0x95, 0x00]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("languages/plugins");
        let reconciler = Reconciler::default();
        let cancel = CancellationToken::new();

        assert!(reconciler.reconcile(pack(), &dest, &plugin_scope(), &cancel).unwrap());
        assert!(!reconciler.reconcile(pack(), &dest, &plugin_scope(), &cancel).unwrap());

        assert_eq!(
            fs::read(dest.join("akismet-fr_FR.mo")).unwrap(),
            vec![0xde, 0x12, 0x04, 0x95, 0x00]
        );
    }

    #[test]
    fn test_reconcile_overwrites_stale_and_skips_current() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().to_path_buf();
        fs::write(dest.join("akismet-fr_FR.po"), b"stale").unwrap();
        fs::write(dest.join("akismet-fr_FR.mo"), [0xde, 0x12, 0x04, 0x95, 0x00]).unwrap();

        let outcome = Reconciler::default()
            .reconcile_detailed(pack(), &dest, &plugin_scope(), &CancellationToken::new())
            .unwrap();

        assert_eq!(outcome.written, 1);
        assert_eq!(outcome.unchanged, 1);
        assert_eq!(outcome.removed, 0);
        assert!(fs::read_to_string(dest.join("akismet-fr_FR.po"))
            .unwrap()
            .contains("Bonjour"));
    }

    #[test]
    fn test_obsolete_files_kept_by_default() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().to_path_buf();
        let old_json = dest.join("akismet-fr_FR-0a1b2c.json");
        fs::write(&old_json, b"{}").unwrap();

        Reconciler::default()
            .reconcile(pack(), &dest, &plugin_scope(), &CancellationToken::new())
            .unwrap();

        assert!(old_json.exists());
    }

    #[test]
    fn test_obsolete_removal_is_scoped() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().to_path_buf();
        for name in [
            "akismet-fr_FR-0a1b2c.json",
            "akismet-de_DE.po",
            "jetpack-fr_FR.po",
        ] {
            fs::write(dest.join(name), b"x").unwrap();
        }
        let reconciler = Reconciler::new(ObsoletePolicy::Remove);
        let cancel = CancellationToken::new();

        reconciler.reconcile(pack(), &dest, &plugin_scope(), &cancel).unwrap();

        assert!(!dest.join("akismet-fr_FR-0a1b2c.json").exists());
        assert!(dest.join("akismet-de_DE.po").exists());
        assert!(dest.join("jetpack-fr_FR.po").exists());
        assert!(dest.join("akismet-fr_FR.po").exists());

        // Nothing left to remove or write.
        assert!(!reconciler.reconcile(pack(), &dest, &plugin_scope(), &cancel).unwrap());
    }

    #[test]
    fn test_removal_alone_counts_as_update() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().to_path_buf();
        let reconciler = Reconciler::new(ObsoletePolicy::Remove);
        let cancel = CancellationToken::new();
        reconciler.reconcile(pack(), &dest, &plugin_scope(), &cancel).unwrap();

        fs::write(dest.join("akismet-fr_FR.l10n.php"), b"<?php").unwrap();
        assert!(reconciler.reconcile(pack(), &dest, &plugin_scope(), &cancel).unwrap());
        assert!(!dest.join("akismet-fr_FR.l10n.php").exists());
    }

    #[test]
    fn test_cancelled_reconcile_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("languages");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = Reconciler::default()
            .reconcile(pack(), &dest, &plugin_scope(), &cancel)
            .unwrap_err();

        assert!(matches!(err, TranslationError::Cancelled));
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }

    #[test]
    fn test_nested_staged_paths() {
        let temp = TempDir::new().unwrap();
        let staged: StagedFileSet = [(PathBuf::from("sub/akismet-fr_FR.po"), b"x".to_vec())]
            .into_iter()
            .collect();

        let updated = Reconciler::default()
            .reconcile(staged, temp.path(), &plugin_scope(), &CancellationToken::new())
            .unwrap();

        assert!(updated);
        assert!(temp.path().join("sub/akismet-fr_FR.po").exists());
    }

    #[test]
    fn test_outcome_updated() {
        assert!(!ReconcileOutcome::default().updated());
        assert!(ReconcileOutcome {
            removed: 1,
            ..Default::default()
        }
        .updated());
    }
}
