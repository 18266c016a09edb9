//! Error types for translation fetching.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for translation operations.
pub type TranslationResult<T> = Result<T, TranslationError>;

/// Errors that can occur while resolving, fetching or writing translations.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Transport-level failure talking to the API or download host.
    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    /// Request exceeded its time budget.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The remote answered, but not with anything usable.
    #[error("translation API error for {url}: {reason}")]
    Api { url: String, reason: String },

    /// Downloaded archive is malformed or unsafe to extract.
    #[error("invalid translation archive: {reason}")]
    Archive { reason: String },

    /// Downloaded archive does not match the advertised checksum.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    /// Failed to read or write the language directory.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem { path: PathBuf, source: io::Error },

    /// The surrounding operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`TranslationError`], used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Api,
    Archive,
    Integrity,
    Filesystem,
    Cancelled,
    Config,
}

impl ErrorKind {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Network => "NetworkError",
            Self::Api => "ApiError",
            Self::Archive => "ArchiveError",
            Self::Integrity => "IntegrityError",
            Self::Filesystem => "FilesystemError",
            Self::Cancelled => "Cancelled",
            Self::Config => "ConfigError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TranslationError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Archive { .. } => ErrorKind::Archive,
            Self::Integrity { .. } => ErrorKind::Integrity,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether a caller may reasonably retry the operation.
    ///
    /// Only transport failures qualify; nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(reason: impl Into<String>) -> Self {
        Self::Archive {
            reason: reason.into(),
        }
    }

    /// Map a reqwest failure to a network error, keeping timeouts distinct.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else {
            Self::Network {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
