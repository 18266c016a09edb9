//! Package kind classification.

use std::fmt;

/// Composer package type for WordPress plugins.
pub const PLUGIN_PACKAGE_TYPE: &str = "wordpress-plugin";

/// Composer package type for WordPress themes.
pub const THEME_PACKAGE_TYPE: &str = "wordpress-theme";

/// Composer package types that may carry a core distribution.
pub const CORE_PACKAGE_TYPES: &[&str] = &["package", "wordpress-core"];

/// The kind of WordPress artifact a package provides.
///
/// Resolved once when a [`PackageDescriptor`](super::PackageDescriptor) is
/// built. `Unrecognized` packages flow through the pipeline but are never
/// sent to the translation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    /// WordPress core distribution.
    Core,
    /// WordPress plugin.
    Plugin,
    /// WordPress theme.
    Theme,
    /// Anything else.
    Unrecognized,
}

impl PackageKind {
    /// Whether translations can exist for this kind.
    pub fn is_translatable(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Collection segment used in translation API paths.
    ///
    /// Returns `None` for unrecognized packages.
    pub fn api_segment(&self) -> Option<&'static str> {
        match self {
            Self::Core => Some("core"),
            Self::Plugin => Some("plugins"),
            Self::Theme => Some("themes"),
            Self::Unrecognized => None,
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core => write!(f, "core"),
            Self::Plugin => write!(f, "plugin"),
            Self::Theme => write!(f, "theme"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}
