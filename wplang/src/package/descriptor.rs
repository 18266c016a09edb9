//! Package identity as seen by the translation pipeline.

use std::fmt;

use super::types::{PackageKind, CORE_PACKAGE_TYPES, PLUGIN_PACKAGE_TYPE, THEME_PACKAGE_TYPE};

/// Composer vendors that publish WordPress core distributions.
pub const DEFAULT_CORE_PROVIDERS: &[&str] = &["roots", "johnpbloch"];

/// Package names under which those vendors publish core.
pub const DEFAULT_CORE_NAMES: &[&str] = &[
    "wordpress",
    "wordpress-no-content",
    "wordpress-full",
    "wordpress-core",
];

/// A package as reported by the dependency manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerPackage {
    /// Full package name, `provider/name`.
    pub name: String,
    /// Composer package type (e.g. `wordpress-plugin`).
    pub package_type: String,
    /// Installed version, possibly composer-normalized (`6.4.2.0`).
    pub version: String,
}

impl ComposerPackage {
    pub fn new(
        name: impl Into<String>,
        package_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            package_type: package_type.into(),
            version: version.into(),
        }
    }

    /// Split the name into `(provider, name)`.
    pub fn split_name(&self) -> Option<(&str, &str)> {
        self.name
            .split_once('/')
            .filter(|(provider, name)| !provider.is_empty() && !name.is_empty())
    }
}

impl fmt::Display for ComposerPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Provider/name pairs accepted as WordPress core distributions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreAllowlist {
    pub providers: Vec<String>,
    pub names: Vec<String>,
}

impl Default for CoreAllowlist {
    fn default() -> Self {
        Self {
            providers: DEFAULT_CORE_PROVIDERS.iter().map(|s| s.to_string()).collect(),
            names: DEFAULT_CORE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CoreAllowlist {
    /// Check whether `provider/name` is a known core distribution.
    pub fn contains(&self, provider: &str, name: &str) -> bool {
        self.providers.iter().any(|p| p == provider) && self.names.iter().any(|n| n == name)
    }
}

/// Immutable identity of one package action.
///
/// # Example
///
/// ```
/// use wplang::package::{ComposerPackage, CoreAllowlist, PackageDescriptor, PackageKind};
///
/// let package = ComposerPackage::new("wpackagist-plugin/akismet", "wordpress-plugin", "5.3.0");
/// let descriptor = PackageDescriptor::classify(&package, &CoreAllowlist::default());
///
/// assert_eq!(descriptor.kind, PackageKind::Plugin);
/// assert_eq!(descriptor.slug, "akismet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub kind: PackageKind,
    pub slug: String,
    pub version: String,
}

impl PackageDescriptor {
    pub fn new(kind: PackageKind, slug: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind,
            slug: slug.into(),
            version: version.into(),
        }
    }

    /// Classify a composer package.
    ///
    /// Core distributions are only recognized when both the provider and the
    /// name appear in `core`; anything else with a core-ish package type is
    /// left unrecognized.
    pub fn classify(package: &ComposerPackage, core: &CoreAllowlist) -> Self {
        let Some((provider, name)) = package.split_name() else {
            return Self::new(PackageKind::Unrecognized, package.name.as_str(), &package.version);
        };

        let kind = match package.package_type.as_str() {
            PLUGIN_PACKAGE_TYPE => PackageKind::Plugin,
            THEME_PACKAGE_TYPE => PackageKind::Theme,
            t if CORE_PACKAGE_TYPES.contains(&t) && core.contains(provider, name) => {
                PackageKind::Core
            }
            _ => PackageKind::Unrecognized,
        };

        Self::new(kind, name, &package.version)
    }

    pub fn is_translatable(&self) -> bool {
        self.kind.is_translatable()
    }
}

impl fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} v{}", self.kind, self.slug, self.version)
    }
}
