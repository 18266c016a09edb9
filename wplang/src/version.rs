//! Version matching between installed packages and translation builds.
//!
//! For every applicable locale the matcher picks, in order of preference:
//!
//! 1. a build whose version equals the installed version,
//! 2. otherwise the highest build version not above the installed version,
//! 3. otherwise nothing (the locale is skipped, which is not an error).
//!
//! On equal versions the record that appears first in the API response wins.
//!
//! Versions are compared as semantic versions after lenient normalization:
//! WordPress and composer use forms such as `6.4`, `v2.1` or `6.4.2.0`.
//! A version that cannot be normalized only ever matches by exact string.

use semver::Version;

use crate::api::TranslationRecord;
use crate::locale::LocaleRequest;

/// Translation build chosen for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTranslation {
    pub locale: String,
    pub record: TranslationRecord,
}

/// Parse a version string leniently into a [`Version`].
///
/// Accepts an optional `v` prefix, one to three numeric components, extra
/// trailing components if they are all zero (composer's `6.4.2.0`), and a
/// `-pre` suffix. Build metadata is ignored.
///
/// # Example
///
/// ```
/// use semver::Version;
/// use wplang::version::parse_lenient;
///
/// assert_eq!(parse_lenient("6.4"), Some(Version::new(6, 4, 0)));
/// assert_eq!(parse_lenient("6.4.2.0"), Some(Version::new(6, 4, 2)));
/// assert_eq!(parse_lenient("trunk"), None);
/// ```
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let without_build = trimmed.split('+').next().unwrap_or(trimmed);
    let (numbers, pre) = match without_build.split_once('-') {
        Some((numbers, pre)) => (numbers, Some(pre)),
        None => (without_build, None),
    };

    let parts = numbers
        .split('.')
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.is_empty() || parts.iter().skip(3).any(|&p| p != 0) {
        return None;
    }

    let component = |i: usize| parts.get(i).copied().unwrap_or(0);
    let mut version = Version::new(component(0), component(1), component(2));
    if let Some(pre) = pre {
        version.pre = semver::Prerelease::new(pre).ok()?;
    }
    Some(version)
}

/// Whether two version strings name the same release.
pub(crate) fn versions_equal(a: &str, b: &str) -> bool {
    if a.trim() == b.trim() {
        return true;
    }
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Select at most one record per applicable locale.
///
/// Output order follows the first appearance of each locale in `records`.
pub fn resolve(
    installed_version: &str,
    records: &[TranslationRecord],
    requested: &LocaleRequest,
) -> Vec<ResolvedTranslation> {
    let installed = parse_lenient(installed_version);
    let locales = requested.select(records.iter().map(|r| r.locale.as_str()));

    locales
        .into_iter()
        .filter_map(|locale| {
            let candidates: Vec<&TranslationRecord> =
                records.iter().filter(|r| r.locale == locale).collect();
            let chosen = select_for_locale(installed_version, installed.as_ref(), &candidates)?;
            Some(ResolvedTranslation {
                locale,
                record: chosen.clone(),
            })
        })
        .collect()
}

fn select_for_locale<'a>(
    installed_raw: &str,
    installed: Option<&Version>,
    candidates: &[&'a TranslationRecord],
) -> Option<&'a TranslationRecord> {
    let exact = candidates
        .iter()
        .find(|r| r.version.trim() == installed_raw.trim())
        .or_else(|| {
            candidates
                .iter()
                .find(|r| versions_equal(&r.version, installed_raw))
        });
    if let Some(exact) = exact {
        return Some(*exact);
    }

    let installed = installed?;
    let mut best: Option<(Version, &'a TranslationRecord)> = None;
    for record in candidates {
        let Some(version) = parse_lenient(&record.version) else {
            continue;
        };
        if &version > installed {
            continue;
        }
        // Strictly greater keeps the earliest record on ties.
        if best.as_ref().map_or(true, |(v, _)| version > *v) {
            best = Some((version, *record));
        }
    }
    best.map(|(_, record)| record)
}
