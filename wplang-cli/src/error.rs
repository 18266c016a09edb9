//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;
use wplang::TranslationError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Translation(#[from] TranslationError),

    #[error("Failed to read lock file {}: {reason}", path.display())]
    LockFile { path: PathBuf, reason: String },

    #[error("Invalid package name '{0}': expected provider/name")]
    PackageName(String),

    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("Failed to set signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
