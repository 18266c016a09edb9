//! Shared setup and output for CLI commands.

use std::path::PathBuf;

use console::style;
use tokio_util::sync::CancellationToken;
use wplang::{
    LocaleRequest, ObsoletePolicy, PackageDescriptor, PackageEvent, Translatable, TranslationReport,
    WplangConfig,
};

use crate::error::CliError;

/// Flags shared by every command. CLI values win over the manifest.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub manifest: PathBuf,
    pub languages: Option<String>,
    pub language_dir: Option<PathBuf>,
    pub api_url: Option<String>,
    pub remove_obsolete: bool,
}

/// Build the effective configuration.
pub fn resolve_config(args: &GlobalArgs) -> Result<WplangConfig, CliError> {
    let mut config = WplangConfig::load(&args.manifest, args.language_dir.as_deref())?;

    if let Some(languages) = &args.languages {
        config = config.with_languages(LocaleRequest::parse_list(languages));
    }
    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url.as_str());
    }
    if args.remove_obsolete {
        config = config.with_obsolete_policy(ObsoletePolicy::Remove);
    }

    Ok(config)
}

/// Wire Ctrl+C to a cancellation token.
pub fn install_cancel_handler() -> Result<CancellationToken, CliError> {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();

    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received interrupt, finishing current file...");
        handler_token.cancel();
    })?;

    Ok(cancel)
}

/// Build a single-purpose runtime for a command.
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Process one package event and print its result lines.
///
/// Translation failures are reported, never returned: a failed translation
/// must not fail the surrounding install.
pub async fn translate_package(
    translatable: &Translatable,
    event: &PackageEvent,
    cancel: &CancellationToken,
) {
    let package = event.package();
    let descriptor = PackageDescriptor::classify(package, &translatable.config().core);
    if !descriptor.is_translatable() {
        return;
    }

    match translatable
        .process(&descriptor, &translatable.config().languages, cancel)
        .await
    {
        Ok(report) => print_report(&package.name, &report),
        Err(e) => print_error(&e.to_string()),
    }
}

fn print_report(package: &str, report: &TranslationReport) {
    for failure in &report.failures {
        print_error(&format!(
            "{} translation for {}: {}",
            failure.locale, package, failure.error
        ));
    }

    if report.updated.is_empty() {
        println!("      - No translations updated for {}", style(package).green());
        return;
    }
    for locale in &report.updated {
        println!(
            "      - Updated translation to {} for {}",
            style(locale).green(),
            style(package).green()
        );
    }
}

fn print_error(message: &str) {
    println!("{}", style(format!("ERROR: {}", message)).red());
}
