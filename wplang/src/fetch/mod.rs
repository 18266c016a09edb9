//! Language pack download and extraction.
//!
//! This module provides:
//! - Streaming HTTP downloads into a scoped staging directory (`http`)
//! - SHA-256 checksum verification (`checksum`)
//! - Zip extraction into memory (`extractor`)
//! - The [`StagedFileSet`] handed to the reconciler (`staged`)
//!
//! # Architecture
//!
//! ```text
//! ResolvedTranslation
//!         │
//!         ▼
//! TranslationFetcher (trait)
//!         └── HttpFetcher
//!                 ├── download  ──► TempDir/<locale>.zip
//!                 ├── verify_checksum (when published)
//!                 └── ZipExtractor ──► StagedFileSet
//! ```

mod checksum;
mod extractor;
mod http;
mod staged;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::TranslationResult;
use crate::version::ResolvedTranslation;

pub use checksum::{calculate_file_checksum, sha256_hex, verify_checksum};
pub use extractor::ZipExtractor;
pub use http::HttpFetcher;
pub use staged::StagedFileSet;

/// Fetches and unpacks the language pack of a resolved translation.
///
/// Implementations must not leave temporary artifacts behind on any exit
/// path, including cancellation.
pub trait TranslationFetcher {
    fn fetch(
        &self,
        resolved: &ResolvedTranslation,
        cancel: &CancellationToken,
    ) -> impl Future<Output = TranslationResult<StagedFileSet>> + Send;
}
