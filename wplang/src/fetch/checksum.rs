//! SHA-256 checksum calculation for language pack verification.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{TranslationError, TranslationResult};

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hex SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Calculate the SHA-256 checksum of a file.
///
/// Returns the lowercase hexadecimal digest.
pub fn calculate_file_checksum(path: &Path) -> TranslationResult<String> {
    let mut file = File::open(path).map_err(|e| TranslationError::filesystem(path, e))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| TranslationError::filesystem(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that a downloaded archive matches its advertised checksum.
///
/// Comparison ignores case and surrounding whitespace. `url` is only used
/// for the error.
pub fn verify_checksum(path: &Path, expected: &str, url: &str) -> TranslationResult<()> {
    let actual = calculate_file_checksum(path)?;
    let expected = expected.trim().to_ascii_lowercase();
    if actual != expected {
        return Err(TranslationError::Integrity {
            url: url.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}
