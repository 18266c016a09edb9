//! Configuration for translation fetching.
//!
//! Configuration is read once by the host (usually from the `extra` section
//! of `composer.json`) and passed into [`Translatable`](crate::Translatable)
//! at construction. There is no process-wide state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{TranslationError, TranslationResult};
use crate::locale::LocaleRequest;
use crate::package::{CoreAllowlist, PackageKind};
use crate::reconcile::ObsoletePolicy;

/// Default translation API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.wordpress.org";

/// Default timeout for translation metadata queries.
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for language pack downloads.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a [`Translatable`](crate::Translatable) pipeline.
#[derive(Debug, Clone)]
pub struct WplangConfig {
    /// Locales to fetch. Empty means all available.
    pub languages: LocaleRequest,

    /// Root of the WordPress language directory.
    pub language_dir: PathBuf,

    /// Subdirectory of `language_dir` for plugin translations.
    pub plugin_subdir: String,

    /// Subdirectory of `language_dir` for theme translations.
    pub theme_subdir: String,

    /// Base URL of the translation API.
    pub api_base_url: String,

    /// Timeout for translation metadata queries.
    pub metadata_timeout: Duration,

    /// Timeout for language pack downloads.
    pub download_timeout: Duration,

    /// What to do with local files a new language pack no longer ships.
    pub obsolete: ObsoletePolicy,

    /// Skip locales whose local `.po` revision is at least as new as the
    /// API's `updated` timestamp.
    pub skip_current: bool,

    /// Locales of one package processed at the same time.
    pub max_concurrent_locales: usize,

    /// Provider/name pairs recognized as WordPress core.
    pub core: CoreAllowlist,
}

impl Default for WplangConfig {
    fn default() -> Self {
        Self {
            languages: LocaleRequest::all(),
            language_dir: PathBuf::from("languages"),
            plugin_subdir: "plugins".to_string(),
            theme_subdir: "themes".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            obsolete: ObsoletePolicy::Keep,
            skip_current: true,
            max_concurrent_locales: 1,
            core: CoreAllowlist::default(),
        }
    }
}

impl WplangConfig {
    /// Create a new configuration writing into `language_dir`.
    pub fn new(language_dir: impl Into<PathBuf>) -> Self {
        Self {
            language_dir: language_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_languages(mut self, languages: LocaleRequest) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn with_obsolete_policy(mut self, policy: ObsoletePolicy) -> Self {
        self.obsolete = policy;
        self
    }

    pub fn with_skip_current(mut self, skip: bool) -> Self {
        self.skip_current = skip;
        self
    }

    /// Set the per-package locale concurrency (at least 1).
    pub fn with_max_concurrent_locales(mut self, max: usize) -> Self {
        self.max_concurrent_locales = max.max(1);
        self
    }

    /// Directory receiving translations for packages of `kind`.
    ///
    /// Core translations live at the root of the language directory;
    /// plugins and themes get their own subdirectories.
    pub fn destination_dir(&self, kind: PackageKind) -> PathBuf {
        match kind {
            PackageKind::Plugin => self.language_dir.join(&self.plugin_subdir),
            PackageKind::Theme => self.language_dir.join(&self.theme_subdir),
            PackageKind::Core | PackageKind::Unrecognized => self.language_dir.clone(),
        }
    }

    /// Load configuration from a `composer.json` manifest.
    ///
    /// The language directory in the manifest is relative to the manifest's
    /// own directory (the project root).
    pub fn from_manifest(path: &Path) -> TranslationResult<Self> {
        Self::load(path, None)
    }

    /// Load configuration, letting `language_dir` override the manifest.
    ///
    /// With an override, a missing manifest is not an error and the
    /// defaults apply to everything else.
    pub fn load(manifest: &Path, language_dir: Option<&Path>) -> TranslationResult<Self> {
        let content = match (fs::read_to_string(manifest), language_dir) {
            (Ok(content), _) => content,
            (Err(e), Some(dir)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(manifest = %manifest.display(), "No manifest, using defaults");
                return Ok(Self::new(dir));
            }
            (Err(e), _) => return Err(TranslationError::filesystem(manifest, e)),
        };
        let root = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse_manifest(&content, &root, language_dir.map(Path::to_path_buf))
    }

    /// Parse manifest JSON, resolving relative paths against `project_root`.
    pub fn from_manifest_str(content: &str, project_root: &Path) -> TranslationResult<Self> {
        Self::parse_manifest(content, project_root, None)
    }

    fn parse_manifest(
        content: &str,
        project_root: &Path,
        language_dir: Option<PathBuf>,
    ) -> TranslationResult<Self> {
        let manifest: Manifest = serde_json::from_str(content)
            .map_err(|e| TranslationError::Config(format!("invalid composer manifest: {}", e)))?;
        let extra = manifest.extra;

        let language_dir = match (language_dir, extra.language_dir.as_deref()) {
            (Some(dir), _) => dir,
            (None, Some(dir)) if !dir.trim().is_empty() => project_root.join(dir),
            (None, _) => {
                return Err(TranslationError::Config(
                    "extra.wordpress-language-dir is not set".to_string(),
                ))
            }
        };

        let mut config = Self::new(language_dir)
            .with_languages(LocaleRequest::new(extra.languages.unwrap_or_default()));

        if let Some(url) = extra.api_base_url {
            config = config.with_api_base_url(url);
        }
        if extra.remove_obsolete.unwrap_or(false) {
            config = config.with_obsolete_policy(ObsoletePolicy::Remove);
        }

        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    extra: ManifestExtra,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestExtra {
    #[serde(rename = "wordpress-languages")]
    languages: Option<Vec<String>>,
    #[serde(rename = "wordpress-language-dir")]
    language_dir: Option<String>,
    #[serde(rename = "wordpress-language-api")]
    api_base_url: Option<String>,
    #[serde(rename = "wordpress-language-remove-obsolete")]
    remove_obsolete: Option<bool>,
}
