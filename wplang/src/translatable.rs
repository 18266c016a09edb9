//! Translation pipeline for a single package action.
//!
//! [`Translatable`] composes the pipeline stages:
//!
//! ```text
//! PackageDescriptor ─► TranslationApi ─► version::resolve ─► per locale:
//!                                                            ├─ revision::is_current (skip)
//!                                                            ├─ TranslationFetcher::fetch
//!                                                            └─ Reconciler::reconcile
//! ```
//!
//! Package-level failures (the API call) surface as an error. Locale-level
//! failures are logged, collected in the [`TranslationReport`] and never
//! stop sibling locales.

use std::io;
use std::path::Path;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{HttpTranslationApi, TranslationApi};
use crate::config::WplangConfig;
use crate::error::{ErrorKind, TranslationError, TranslationResult};
use crate::fetch::{HttpFetcher, TranslationFetcher};
use crate::locale::LocaleRequest;
use crate::package::{PackageDescriptor, PackageEvent};
use crate::reconcile::{LocaleScope, Reconciler};
use crate::revision;
use crate::version::{self, ResolvedTranslation};

/// A locale that could not be updated.
#[derive(Debug)]
pub struct LocaleFailure {
    pub locale: String,
    pub error: TranslationError,
}

/// Result of processing one package.
#[derive(Debug, Default)]
pub struct TranslationReport {
    /// Locales whose files changed on disk.
    pub updated: Vec<String>,
    /// Locales fetched but already identical on disk.
    pub unchanged: Vec<String>,
    /// Locales skipped because the local revision is current.
    pub current: Vec<String>,
    /// Locales that failed.
    pub failures: Vec<LocaleFailure>,
}

/// Outcome for one locale.
#[derive(Debug)]
enum LocaleOutcome {
    Updated,
    Unchanged,
    Current,
    Failed(TranslationError),
}

/// Fetches and installs translations for packages.
///
/// Holds no state between calls; one instance may serve any number of
/// package actions, and independent instances can run side by side.
///
/// # Example
///
/// ```ignore
/// use tokio_util::sync::CancellationToken;
/// use wplang::{LocaleRequest, PackageDescriptor, PackageKind, Translatable, WplangConfig};
///
/// let config = WplangConfig::new("web/app/languages");
/// let translatable = Translatable::from_config(config)?;
///
/// let descriptor = PackageDescriptor::new(PackageKind::Plugin, "akismet", "5.3.0");
/// let report = translatable
///     .process(&descriptor, &LocaleRequest::new(["fr_FR"]), &CancellationToken::new())
///     .await?;
/// println!("updated: {:?}", report.updated);
/// ```
#[derive(Debug)]
pub struct Translatable<A = HttpTranslationApi, F = HttpFetcher> {
    config: WplangConfig,
    api: A,
    fetcher: F,
    reconciler: Reconciler,
}

impl Translatable<HttpTranslationApi, HttpFetcher> {
    /// Build a pipeline talking to the configured translation API.
    pub fn from_config(config: WplangConfig) -> TranslationResult<Self> {
        let api = HttpTranslationApi::with_settings(&config.api_base_url, config.metadata_timeout)?;
        let fetcher = HttpFetcher::with_timeout(config.download_timeout)?;
        Ok(Self::new(config, api, fetcher))
    }
}

impl<A: TranslationApi, F: TranslationFetcher> Translatable<A, F> {
    pub fn new(config: WplangConfig, api: A, fetcher: F) -> Self {
        let reconciler = Reconciler::new(config.obsolete);
        Self {
            config,
            api,
            fetcher,
            reconciler,
        }
    }

    pub fn config(&self) -> &WplangConfig {
        &self.config
    }

    /// Handle a package install/update event with the configured locales.
    ///
    /// Returns the updated locales. Never fails: package-level errors are
    /// logged and yield an empty list.
    pub async fn on_package_action(
        &self,
        event: &PackageEvent,
        cancel: &CancellationToken,
    ) -> Vec<String> {
        let package = event.package();
        let descriptor = PackageDescriptor::classify(package, &self.config.core);

        match self.process(&descriptor, &self.config.languages, cancel).await {
            Ok(report) => report.updated,
            Err(error) => {
                warn!(
                    package = %package.name,
                    operation = %event.operation,
                    error_kind = %error.kind(),
                    error = %error,
                    "Translation update failed"
                );
                Vec::new()
            }
        }
    }

    /// Run the pipeline for one package.
    ///
    /// Unrecognized packages return an empty report without any network
    /// traffic.
    pub async fn process(
        &self,
        descriptor: &PackageDescriptor,
        request: &LocaleRequest,
        cancel: &CancellationToken,
    ) -> TranslationResult<TranslationReport> {
        if !descriptor.is_translatable() {
            debug!(package = %descriptor.slug, "Package kind has no translations, skipping");
            return Ok(TranslationReport::default());
        }
        if cancel.is_cancelled() {
            return Err(TranslationError::Cancelled);
        }

        let request_records =
            self.api
                .list_translations(descriptor.kind, &descriptor.slug, &descriptor.version);
        let records = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TranslationError::Cancelled),
            result = request_records => result?,
        };
        let resolved = version::resolve(&descriptor.version, &records, request);

        if resolved.is_empty() {
            info!(
                package = %descriptor,
                available = records.len(),
                "No matching translations"
            );
            return Ok(TranslationReport::default());
        }

        let dest_dir = self.config.destination_dir(descriptor.kind);
        let outcomes: Vec<(String, LocaleOutcome)> = stream::iter(resolved)
            .map(|resolved| self.process_locale(descriptor, resolved, &dest_dir, cancel))
            .buffered(self.config.max_concurrent_locales.max(1))
            .collect()
            .await;

        let mut report = TranslationReport::default();
        for (locale, outcome) in outcomes {
            match outcome {
                LocaleOutcome::Updated => report.updated.push(locale),
                LocaleOutcome::Unchanged => report.unchanged.push(locale),
                LocaleOutcome::Current => report.current.push(locale),
                LocaleOutcome::Failed(error) => {
                    log_locale_failure(descriptor, &locale, &error);
                    report.failures.push(LocaleFailure { locale, error });
                }
            }
        }

        info!(
            package = %descriptor,
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            current = report.current.len(),
            failed = report.failures.len(),
            "Translations processed"
        );

        Ok(report)
    }

    async fn process_locale(
        &self,
        descriptor: &PackageDescriptor,
        resolved: ResolvedTranslation,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> (String, LocaleOutcome) {
        let scope = LocaleScope::new(descriptor.kind, &descriptor.slug, &resolved.locale);

        if self.config.skip_current && revision::is_current(dest_dir, &scope, &resolved.record) {
            debug!(package = %descriptor.slug, locale = %resolved.locale, "Local translation is current");
            return (resolved.locale, LocaleOutcome::Current);
        }

        let outcome = match self.fetch_and_reconcile(&resolved, dest_dir, &scope, cancel).await {
            Ok(true) => LocaleOutcome::Updated,
            Ok(false) => LocaleOutcome::Unchanged,
            Err(error) => LocaleOutcome::Failed(error),
        };
        (resolved.locale, outcome)
    }

    async fn fetch_and_reconcile(
        &self,
        resolved: &ResolvedTranslation,
        dest_dir: &Path,
        scope: &LocaleScope,
        cancel: &CancellationToken,
    ) -> TranslationResult<bool> {
        let staged = self.fetcher.fetch(resolved, cancel).await?;

        let reconciler = self.reconciler;
        let dest = dest_dir.to_path_buf();
        let scope = scope.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || reconciler.reconcile(staged, &dest, &scope, &cancel))
            .await
            .map_err(|e| TranslationError::filesystem(dest_dir, io::Error::other(e)))?
    }
}

fn log_locale_failure(descriptor: &PackageDescriptor, locale: &str, error: &TranslationError) {
    if error.kind() == ErrorKind::Cancelled {
        info!(package = %descriptor.slug, locale, "Translation update cancelled");
        return;
    }
    warn!(
        package = %descriptor.slug,
        kind = %descriptor.kind,
        locale,
        error_kind = %error.kind(),
        error = %error,
        "Failed to update translation"
    );
}
