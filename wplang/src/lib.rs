//! Wplang - WordPress translation sync for composer-managed projects
//!
//! When a WordPress core, plugin or theme package is installed or updated,
//! this library asks the WordPress translation API which language packs
//! exist for it, picks the best build per locale, downloads and verifies
//! each pack, and writes its files into the project's language directory.
//!
//! The entry point is [`Translatable`]; the CLI crate wraps it.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod locale;
pub mod package;
pub mod reconcile;
pub mod revision;
pub mod translatable;
pub mod version;

pub use api::{HttpTranslationApi, TranslationApi, TranslationRecord};
pub use config::WplangConfig;
pub use error::{ErrorKind, TranslationError, TranslationResult};
pub use fetch::{HttpFetcher, StagedFileSet, TranslationFetcher};
pub use locale::LocaleRequest;
pub use package::{
    ComposerPackage, CoreAllowlist, Operation, PackageDescriptor, PackageEvent, PackageKind,
};
pub use reconcile::{ObsoletePolicy, Reconciler};
pub use translatable::{LocaleFailure, Translatable, TranslationReport};
pub use version::ResolvedTranslation;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
