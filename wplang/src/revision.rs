//! Freshness check against locally installed `.po` files.
//!
//! The translation API reports when each language pack was last updated.
//! If the local `.po` header names the same build and says it was revised at
//! or after that time, the download can be skipped entirely.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;

use crate::api::TranslationRecord;
use crate::reconcile::LocaleScope;
use crate::version::versions_equal;

/// Format of the API's `updated` field (UTC).
const API_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats seen in `PO-Revision-Date` headers.
const PO_DATE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M%z"];

fn revision_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^"PO-Revision-Date:\s*([^"\\]+)"#)
            .expect("valid PO-Revision-Date regex")
    })
}

fn project_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^"Project-Id-Version:\s*([^"\\]+)"#)
            .expect("valid Project-Id-Version regex")
    })
}

/// Parse the API's `updated` timestamp.
pub fn parse_api_updated(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), API_UPDATED_FORMAT).ok()
}

/// Extract the `PO-Revision-Date` header from `.po` content, as UTC.
pub fn parse_po_revision(content: &str) -> Option<NaiveDateTime> {
    let raw = revision_regex().captures(content)?.get(1)?.as_str().trim();
    PO_DATE_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(raw, format).ok())
        .map(|dt| dt.naive_utc())
}

/// Whether the `Project-Id-Version` header of `.po` content names `version`.
///
/// The header is free text such as `Akismet 5.3.0`; any whitespace or
/// bracket separated word may carry the version.
pub fn names_version(content: &str, version: &str) -> bool {
    let Some(header) = project_version_regex()
        .captures(content)
        .and_then(|c| c.get(1))
    else {
        return false;
    };
    header
        .as_str()
        .split(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ','))
        .filter(|word| !word.is_empty())
        .any(|word| versions_equal(word, version))
}

/// Whether the installed translation for `scope` is the build described by
/// `record` and at least as new as its `updated` time.
///
/// A local file revised later but for another version (after a downgrade,
/// say) is not current. Any missing file, missing header or unparseable
/// date yields `false`, so uncertainty always leads to a fetch.
pub fn is_current(dest_dir: &Path, scope: &LocaleScope, record: &TranslationRecord) -> bool {
    let Some(remote) = record.updated.as_deref().and_then(parse_api_updated) else {
        return false;
    };
    let Some(po_name) = scope.po_file_name() else {
        return false;
    };
    let Ok(content) = fs::read_to_string(dest_dir.join(po_name)) else {
        return false;
    };

    names_version(&content, &record.version)
        && parse_po_revision(&content).is_some_and(|local| local >= remote)
}
