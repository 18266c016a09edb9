//! Wplang CLI - Command-line interface
//!
//! Stand-in for the dependency-manager plugin: turns package events into
//! translation runs and prints one line per result.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::common::GlobalArgs;
use commands::package::{OperationArg, PackageArgs};
use commands::sync::SyncArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "wplang")]
#[command(version = wplang::VERSION)]
#[command(about = "Fetch WordPress translations for composer-managed packages")]
struct Cli {
    /// Path to the project's composer.json
    #[arg(long, global = true, default_value = "composer.json")]
    manifest: PathBuf,

    /// Comma-separated locales to fetch (overrides extra.wordpress-languages)
    #[arg(long, global = true)]
    languages: Option<String>,

    /// Language directory (overrides extra.wordpress-language-dir)
    #[arg(long, global = true)]
    language_dir: Option<PathBuf>,

    /// Translation API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Remove translation files no longer shipped by a language pack
    #[arg(long, global = true)]
    remove_obsolete: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch translations for one installed or updated package
    Package {
        /// Composer package name (provider/name)
        name: String,

        /// Composer package type
        #[arg(long = "type", default_value = "wordpress-plugin")]
        package_type: String,

        /// Installed package version
        #[arg(long)]
        version: String,

        /// Operation that triggered the run
        #[arg(long, value_enum, default_value = "install")]
        operation: OperationArg,
    },

    /// Fetch translations for every package in a composer lock file
    Sync {
        /// Path to composer.lock
        #[arg(long, default_value = "composer.lock")]
        lock: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "wplang=warn",
        1 => "wplang=debug",
        _ => "wplang=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let global = GlobalArgs {
        manifest: cli.manifest,
        languages: cli.languages,
        language_dir: cli.language_dir,
        api_url: cli.api_url,
        remove_obsolete: cli.remove_obsolete,
    };

    let result: Result<(), CliError> = match cli.command {
        Commands::Package {
            name,
            package_type,
            version,
            operation,
        } => commands::package::run(
            &global,
            PackageArgs {
                name,
                package_type,
                version,
                operation,
            },
        ),
        Commands::Sync { lock } => commands::sync::run(&global, SyncArgs { lock }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
