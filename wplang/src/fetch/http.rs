//! HTTP language pack fetcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::checksum::verify_checksum;
use super::extractor::ZipExtractor;
use super::staged::StagedFileSet;
use super::TranslationFetcher;
use crate::error::{TranslationError, TranslationResult};
use crate::version::ResolvedTranslation;

/// Prefix of the per-download staging directories.
const STAGING_PREFIX: &str = "wplang-";

/// Downloads language packs over HTTP and extracts them in memory.
///
/// Every download gets its own temporary staging directory. The directory
/// is removed when the fetch finishes, fails, or its future is dropped.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    extractor: ZipExtractor,
    /// Parent of the staging directories; the system temp dir when unset.
    staging_root: Option<PathBuf>,
}

impl HttpFetcher {
    /// Create a fetcher with a custom download timeout.
    pub fn with_timeout(timeout: Duration) -> TranslationResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wplang/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            extractor: ZipExtractor::new(),
            staging_root: None,
        })
    }

    /// Create staging directories under `root` instead of the system temp dir.
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(root.into());
        self
    }

    fn create_staging_dir(&self) -> TranslationResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);
        match &self.staging_root {
            Some(root) => {
                std::fs::create_dir_all(root)
                    .map_err(|e| TranslationError::filesystem(root, e))?;
                builder
                    .tempdir_in(root)
                    .map_err(|e| TranslationError::filesystem(root, e))
            }
            None => builder
                .tempdir()
                .map_err(|e| TranslationError::filesystem(std::env::temp_dir(), e)),
        }
    }

    /// Stream `url` into `dest`, aborting promptly on cancellation.
    ///
    /// Returns the number of bytes written.
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> TranslationResult<u64> {
        let timeout_secs = self.timeout.as_secs();

        let mut response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TranslationError::Cancelled),
            result = self.client.get(url).send() => {
                result.map_err(|e| TranslationError::from_reqwest(url, e, timeout_secs))?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Network {
                url: url.to_string(),
                reason: format!("download failed with status {}", status),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| TranslationError::filesystem(dest, e))?;
        let mut written = 0u64;

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TranslationError::Cancelled),
                chunk = response.chunk() => {
                    chunk.map_err(|e| TranslationError::from_reqwest(url, e, timeout_secs))?
                }
            };
            let Some(chunk) = chunk else {
                break;
            };

            file.write_all(&chunk)
                .await
                .map_err(|e| TranslationError::filesystem(dest, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| TranslationError::filesystem(dest, e))?;

        Ok(written)
    }
}

impl TranslationFetcher for HttpFetcher {
    async fn fetch(
        &self,
        resolved: &ResolvedTranslation,
        cancel: &CancellationToken,
    ) -> TranslationResult<StagedFileSet> {
        let record = &resolved.record;
        let staging = self.create_staging_dir()?;
        let archive_path = staging.path().join(format!("{}.zip", resolved.locale));

        let bytes = self
            .download(&record.package_url, &archive_path, cancel)
            .await?;
        debug!(
            locale = %resolved.locale,
            url = %record.package_url,
            bytes,
            "Downloaded language pack"
        );

        let extractor = self.extractor;
        let checksum = record.checksum.clone();
        let url = record.package_url.clone();
        // The staging dir moves with the archive and is removed on the blocking thread.
        let staged = tokio::task::spawn_blocking(move || {
            let _staging = staging;
            if let Some(expected) = &checksum {
                verify_checksum(&archive_path, expected, &url)?;
            }
            extractor.extract(&archive_path)
        })
        .await
        .map_err(|e| TranslationError::archive(format!("extraction task failed: {}", e)))??;
        debug!(locale = %resolved.locale, files = staged.len(), "Extracted language pack");

        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TranslationRecord;
    use crate::fetch::checksum::sha256_hex;
    use crate::fetch::extractor::test_support::zip_bytes;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolved(url: String, checksum: Option<String>) -> ResolvedTranslation {
        let mut record = TranslationRecord::new("fr_FR", "2.1.0", url);
        record.checksum = checksum;
        ResolvedTranslation {
            locale: "fr_FR".to_string(),
            record,
        }
    }

    fn fetcher_in(root: &Path) -> HttpFetcher {
        HttpFetcher::with_timeout(Duration::from_secs(5))
            .unwrap()
            .with_staging_root(root)
    }

    fn assert_no_staging_left(root: &Path) {
        let leftovers: Vec<_> = std::fs::read_dir(root).unwrap().collect();
        assert!(leftovers.is_empty(), "staging leaked: {:?}", leftovers);
    }

    async fn serve(server: &MockServer, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path("/fr_FR.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_and_extract() {
        let server = MockServer::start().await;
        let archive = zip_bytes(&[("example-plugin-fr_FR.po", &b"msgstr \"Bonjour\""[..])]);
        let checksum = sha256_hex(&archive);
        serve(&server, archive).await;

        let staging = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher_in(staging.path());
        let staged = fetcher
            .fetch(
                &resolved(format!("{}/fr_FR.zip", server.uri()), Some(checksum)),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            staged.get(Path::new("example-plugin-fr_FR.po")),
            Some(&b"msgstr \"Bonjour\""[..])
        );
        assert_no_staging_left(staging.path());
    }

    #[tokio::test]
    async fn test_fetch_checksum_mismatch() {
        let server = MockServer::start().await;
        serve(&server, zip_bytes(&[("a-fr_FR.po", &b"x"[..])])).await;

        let staging = tempfile::TempDir::new().unwrap();
        let fetcher = fetcher_in(staging.path());
        let err = fetcher
            .fetch(
                &resolved(format!("{}/fr_FR.zip", server.uri()), Some("abc".to_string())),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Integrity { .. }));
        assert_no_staging_left(staging.path());
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(
                &resolved(format!("{}/fr_FR.zip", server.uri()), None),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Network { .. }));
    }

    #[tokio::test]
    async fn test_fetch_corrupt_archive() {
        let server = MockServer::start().await;
        serve(&server, b"definitely not a zip".to_vec()).await;

        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(
                &resolved(format!("{}/fr_FR.zip", server.uri()), None),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Archive { .. }));
    }

    #[tokio::test]
    async fn test_fetch_cancelled_before_start() {
        let server = MockServer::start().await;
        serve(&server, zip_bytes(&[("a-fr_FR.po", &b"x"[..])])).await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(&resolved(format!("{}/fr_FR.zip", server.uri()), None), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Cancelled));
    }

    #[tokio::test]
    async fn test_fetch_cancelled_during_slow_download() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(zip_bytes(&[("a-fr_FR.po", &b"x"[..])]))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let staging = tempfile::TempDir::new().unwrap();
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(60))
            .unwrap()
            .with_staging_root(staging.path());
        let started = std::time::Instant::now();
        let err = fetcher
            .fetch(&resolved(format!("{}/fr_FR.zip", server.uri()), None), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, TranslationError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_no_staging_left(staging.path());
    }
}
