//! Translation records and response parsing.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{TranslationError, TranslationResult};

/// One fetchable translation build reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    /// Locale code (e.g. `fr_FR`).
    pub locale: String,
    /// Package version the translation was built for.
    pub version: String,
    /// Download URL of the language pack archive.
    pub package_url: String,
    /// SHA-256 of the archive, when published.
    pub checksum: Option<String>,
    /// Last update time as reported by the API (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub updated: Option<String>,
}

impl TranslationRecord {
    pub fn new(
        locale: impl Into<String>,
        version: impl Into<String>,
        package_url: impl Into<String>,
    ) -> Self {
        Self {
            locale: locale.into(),
            version: version.into(),
            package_url: package_url.into(),
            checksum: None,
            updated: None,
        }
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    pub fn with_updated(mut self, updated: impl Into<String>) -> Self {
        self.updated = Some(updated.into());
        self
    }
}

/// Entry as it appears on the wire. Every field is optional; entries that
/// lack the essentials are dropped rather than failing the whole response.
#[derive(Debug, Deserialize)]
struct RawTranslation {
    language: Option<String>,
    version: Option<String>,
    package: Option<String>,
    updated: Option<String>,
    checksum: Option<String>,
    sha256: Option<String>,
}

impl RawTranslation {
    fn into_record(self) -> Option<TranslationRecord> {
        let locale = non_empty(self.language)?;
        let version = non_empty(self.version)?;
        let package_url = non_empty(self.package)?;
        Some(TranslationRecord {
            locale,
            version,
            package_url,
            checksum: non_empty(self.checksum).or_else(|| non_empty(self.sha256)),
            updated: non_empty(self.updated),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse a translation API response body.
///
/// A missing `translations` key is an empty result. A body that is not a
/// JSON object, or that carries an `error` member, is an API error.
pub fn parse_translations(body: &str, url: &str) -> TranslationResult<Vec<TranslationRecord>> {
    let api_error = |reason: String| TranslationError::Api {
        url: url.to_string(),
        reason,
    };

    let value: Value =
        serde_json::from_str(body).map_err(|e| api_error(format!("unparseable body: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| api_error("response is not a JSON object".to_string()))?;

    if let Some(error) = object.get("error").filter(|e| !e.is_null()) {
        let reason = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(api_error(reason));
    }

    let entries = match object.get("translations") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(api_error("`translations` is not an array".to_string())),
    };

    let records = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let record = serde_json::from_value::<RawTranslation>(entry.clone())
                .ok()
                .and_then(RawTranslation::into_record);
            if record.is_none() {
                debug!(url, index, "Skipping incomplete translation entry");
            }
            record
        })
        .collect();

    Ok(records)
}
