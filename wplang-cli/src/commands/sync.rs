//! Sync command - replay an install event for every locked package.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;
use wplang::{ComposerPackage, PackageEvent, Translatable};

use super::common::{
    install_cancel_handler, resolve_config, runtime, translate_package, GlobalArgs,
};
use crate::error::CliError;

/// Arguments for the sync command.
pub struct SyncArgs {
    pub lock: PathBuf,
}

#[derive(Debug, Deserialize)]
struct LockFile {
    #[serde(default)]
    packages: Vec<LockedPackage>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
    #[serde(default = "default_package_type", rename = "type")]
    package_type: String,
}

fn default_package_type() -> String {
    "library".to_string()
}

/// Read all packages from a composer lock file, dev packages last.
fn read_lock_file(path: &Path) -> Result<Vec<ComposerPackage>, CliError> {
    let lock_error = |reason: String| CliError::LockFile {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| lock_error(e.to_string()))?;
    let lock: LockFile = serde_json::from_str(&content).map_err(|e| lock_error(e.to_string()))?;

    Ok(lock
        .packages
        .into_iter()
        .chain(lock.packages_dev)
        .map(|p| ComposerPackage::new(p.name, p.package_type, p.version))
        .collect())
}

/// Run the sync command.
pub fn run(global: &GlobalArgs, args: SyncArgs) -> Result<(), CliError> {
    let packages = read_lock_file(&args.lock)?;
    let config = resolve_config(global)?;
    let translatable = Translatable::from_config(config)?;
    let cancel = install_cancel_handler()?;

    info!(lock = %args.lock.display(), packages = packages.len(), "Syncing translations");

    runtime()?.block_on(async {
        for package in packages {
            if cancel.is_cancelled() {
                break;
            }
            let event = PackageEvent::install(package);
            translate_package(&translatable, &event, &cancel).await;
        }
    });

    Ok(())
}
