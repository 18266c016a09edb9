//! HTTP client for the WordPress translation API.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::record::{parse_translations, TranslationRecord};
use crate::error::{TranslationError, TranslationResult};
use crate::package::PackageKind;

/// Source of translation metadata.
///
/// An empty result is a valid outcome: the package simply has no
/// published translations.
pub trait TranslationApi {
    /// List the translation builds available for a package.
    fn list_translations(
        &self,
        kind: PackageKind,
        slug: &str,
        version: &str,
    ) -> impl Future<Output = TranslationResult<Vec<TranslationRecord>>> + Send;
}

/// Translation API client backed by `api.wordpress.org`-compatible hosts.
///
/// Endpoints follow `{base}/translations/{core|plugins|themes}/1.0/` with
/// `version` and, except for core, `slug` query parameters.
#[derive(Debug, Clone)]
pub struct HttpTranslationApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTranslationApi {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn with_settings(base_url: impl Into<String>, timeout: Duration) -> TranslationResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wplang/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslationError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Endpoint URL for a package kind, without query parameters.
    pub fn endpoint(&self, kind: PackageKind) -> Option<String> {
        kind.api_segment()
            .map(|segment| format!("{}/translations/{}/1.0/", self.base_url, segment))
    }

    fn query(kind: PackageKind, slug: &str, version: &str) -> Vec<(&'static str, String)> {
        let mut query = vec![("version", version.to_string())];
        if kind != PackageKind::Core {
            query.push(("slug", slug.to_string()));
        }
        query
    }
}

impl TranslationApi for HttpTranslationApi {
    async fn list_translations(
        &self,
        kind: PackageKind,
        slug: &str,
        version: &str,
    ) -> TranslationResult<Vec<TranslationRecord>> {
        let Some(url) = self.endpoint(kind) else {
            return Ok(Vec::new());
        };
        let timeout_secs = self.timeout.as_secs();

        debug!(%kind, slug, version, url = %url, "Querying translation API");

        let response = self
            .client
            .get(&url)
            .query(&Self::query(kind, slug, version))
            .send()
            .await
            .map_err(|e| TranslationError::from_reqwest(&url, e, timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Api {
                url,
                reason: format!("request failed with status {}", status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::from_reqwest(&url, e, timeout_secs))?;

        let records = parse_translations(&body, &url)?;
        debug!(%kind, slug, count = records.len(), "Translation API returned records");
        Ok(records)
    }
}
