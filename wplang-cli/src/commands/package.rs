//! Package command - fetch translations for a single package event.

use clap::ValueEnum;
use wplang::{ComposerPackage, PackageEvent, Translatable};

use super::common::{
    install_cancel_handler, resolve_config, runtime, translate_package, GlobalArgs,
};
use crate::error::CliError;

/// Package operation selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OperationArg {
    /// The package was freshly installed
    Install,
    /// The package was updated to the given version
    Update,
}

/// Arguments for the package command.
pub struct PackageArgs {
    pub name: String,
    pub package_type: String,
    pub version: String,
    pub operation: OperationArg,
}

/// Build the event the dependency manager would deliver.
fn build_event(args: &PackageArgs) -> Result<PackageEvent, CliError> {
    if args.name.split_once('/').is_none() {
        return Err(CliError::PackageName(args.name.clone()));
    }

    let package = ComposerPackage::new(&args.name, &args.package_type, &args.version);
    Ok(match args.operation {
        OperationArg::Install => PackageEvent::install(package),
        // Only the target matters for translations; the previous version is unknown here.
        OperationArg::Update => PackageEvent::update(package.clone(), package),
    })
}

/// Run the package command.
pub fn run(global: &GlobalArgs, args: PackageArgs) -> Result<(), CliError> {
    let event = build_event(&args)?;
    let config = resolve_config(global)?;
    let translatable = Translatable::from_config(config)?;
    let cancel = install_cancel_handler()?;

    runtime()?.block_on(translate_package(&translatable, &event, &cancel));
    Ok(())
}
