//! WordPress package identity and classification.
//!
//! The dependency manager reports packages by composer name and type. This
//! module turns them into a [`PackageDescriptor`] with a closed
//! [`PackageKind`], resolved once so the rest of the pipeline never compares
//! type strings.
//!
//! ```text
//! PackageEvent ──► ComposerPackage ──classify──► PackageDescriptor
//!   operation        name, type,                 kind: Core | Plugin |
//!   target           version                           Theme | Unrecognized
//! ```

mod descriptor;
mod event;
mod types;

pub use descriptor::{
    ComposerPackage, CoreAllowlist, PackageDescriptor, DEFAULT_CORE_NAMES, DEFAULT_CORE_PROVIDERS,
};
pub use event::{Operation, PackageEvent};
pub use types::{PackageKind, CORE_PACKAGE_TYPES, PLUGIN_PACKAGE_TYPE, THEME_PACKAGE_TYPE};
