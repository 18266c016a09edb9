//! Ownership of language directory files.

use crate::package::PackageKind;

/// The package and locale a reconciliation pass is responsible for.
///
/// Decides which files in a shared language directory belong to that
/// package+locale, so obsolete-file removal never touches anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleScope {
    pub kind: PackageKind,
    pub slug: String,
    pub locale: String,
}

impl LocaleScope {
    pub fn new(kind: PackageKind, slug: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            kind,
            slug: slug.into(),
            locale: locale.into(),
        }
    }

    /// Whether a file name in the destination directory belongs to this scope.
    ///
    /// Plugin and theme files are `{slug}-{locale}.*` or
    /// `{slug}-{locale}-{hash}.json`. Core files are `{locale}.*`,
    /// `{locale}-{hash}.json` or `{component}-{locale}.*`
    /// (`admin-fr_FR.po`, `continents-cities-fr_FR.mo`).
    pub fn owns(&self, file_name: &str) -> bool {
        match self.kind {
            PackageKind::Plugin | PackageKind::Theme => {
                let prefix = format!("{}-{}", self.slug, self.locale);
                file_name
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('-'))
            }
            PackageKind::Core => {
                let locale = self.locale.as_str();
                let own_prefix = file_name
                    .strip_prefix(locale)
                    .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('-'));
                own_prefix || file_name.contains(&format!("-{}.", locale))
            }
            PackageKind::Unrecognized => false,
        }
    }

    /// Name of the main `.po` file for this scope.
    pub fn po_file_name(&self) -> Option<String> {
        match self.kind {
            PackageKind::Plugin | PackageKind::Theme => {
                Some(format!("{}-{}.po", self.slug, self.locale))
            }
            PackageKind::Core => Some(format!("{}.po", self.locale)),
            PackageKind::Unrecognized => None,
        }
    }
}
