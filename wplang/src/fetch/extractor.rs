//! Language pack extraction.
//!
//! WordPress language packs are flat zip archives holding `.po`, `.mo`,
//! `.l10n.php` and script `.json` files. Extraction reads them into a
//! [`StagedFileSet`]; nothing is written to disk here.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use zip::ZipArchive;

use super::staged::StagedFileSet;
use crate::error::{TranslationError, TranslationResult};

/// Upper bound for preallocating an entry buffer from its declared size.
const MAX_PREALLOC: u64 = 8 * 1024 * 1024;

/// Zip archive extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every file of the archive at `archive_path`.
    ///
    /// Fails with an archive error if the file is not a readable zip, if an
    /// entry's path would escape the extraction root, if an entry fails its
    /// CRC check, or if the archive holds no files at all.
    pub fn extract(&self, archive_path: &Path) -> TranslationResult<StagedFileSet> {
        let file =
            File::open(archive_path).map_err(|e| TranslationError::filesystem(archive_path, e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| TranslationError::archive(format!("not a zip archive: {}", e)))?;

        let mut staged = StagedFileSet::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| {
                TranslationError::archive(format!("unreadable entry #{}: {}", index, e))
            })?;

            if entry.is_dir() {
                continue;
            }

            let Some(relative) = entry.enclosed_name() else {
                return Err(TranslationError::archive(format!(
                    "entry {:?} escapes the archive root",
                    entry.name()
                )));
            };

            let mut content = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
            entry.read_to_end(&mut content).map_err(|e| {
                TranslationError::archive(format!("corrupt entry {}: {}", relative.display(), e))
            })?;

            staged.insert(relative, content);
        }

        if staged.is_empty() {
            return Err(TranslationError::archive("archive contains no files"));
        }

        Ok(staged)
    }
}
