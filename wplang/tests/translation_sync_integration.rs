//! Integration tests for the translation pipeline.
//!
//! These tests run [`Translatable`] against a mock translation API and a
//! mock download host:
//! - API lookup → version match → download → verify → write
//! - Per-locale failures are isolated
//! - Package-level failures surface as errors
//!
//! Run with: `cargo test --test translation_sync_integration`

use std::fs;
use std::io::{Cursor, Write};
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use wplang::fetch::sha256_hex;
use wplang::{
    ComposerPackage, ErrorKind, LocaleRequest, ObsoletePolicy, PackageDescriptor, PackageEvent,
    PackageKind, Translatable, WplangConfig,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Build an in-memory zip archive.
fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn config_for(server: &MockServer, language_dir: &std::path::Path) -> WplangConfig {
    WplangConfig::new(language_dir)
        .with_api_base_url(server.uri())
        .with_metadata_timeout(Duration::from_secs(5))
        .with_download_timeout(Duration::from_secs(5))
}

fn translation(
    server: &MockServer,
    locale: &str,
    version: &str,
    checksum: Option<&str>,
) -> serde_json::Value {
    let mut entry = json!({
        "language": locale,
        "version": version,
        "updated": "2024-01-15 10:22:33",
        "package": format!("{}/packs/{}-{}.zip", server.uri(), locale, version),
    });
    if let Some(checksum) = checksum {
        entry["checksum"] = json!(checksum);
    }
    entry
}

async fn mount_pack(server: &MockServer, locale: &str, version: &str, archive: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/packs/{}-{}.zip", locale, version)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(server)
        .await;
}

fn example_plugin() -> PackageDescriptor {
    PackageDescriptor::new(PackageKind::Plugin, "example-plugin", "2.1.0")
}

// ============================================================================
// Successful sync
// ============================================================================

#[tokio::test]
async fn test_plugin_translation_is_installed() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    let archive = zip_bytes(&[
        ("example-plugin-fr_FR.po", "msgid \"Hello\"\nmsgstr \"Bonjour\"\n"),
        ("example-plugin-fr_FR.mo", "binary"),
    ]);
    let checksum = sha256_hex(&archive);

    Mock::given(method("GET"))
        .and(path("/translations/plugins/1.0/"))
        .and(query_param("slug", "example-plugin"))
        .and(query_param("version", "2.1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [
                translation(&server, "fr_FR", "2.1.0", Some(checksum.as_str())),
                translation(&server, "de_DE", "2.1.0", None),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_pack(&server, "fr_FR", "2.1.0", archive).await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let report = translatable
        .process(&example_plugin(), &LocaleRequest::new(["fr_FR"]), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.updated, vec!["fr_FR"]);
    assert!(report.failures.is_empty());

    let po = temp.path().join("plugins/example-plugin-fr_FR.po");
    assert!(fs::read_to_string(po).unwrap().contains("Bonjour"));
    assert!(temp.path().join("plugins/example-plugin-fr_FR.mo").exists());
    assert!(!temp.path().join("plugins/example-plugin-de_DE.po").exists());
}

#[tokio::test]
async fn test_older_build_is_used_when_no_exact_match() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/translations/themes/1.0/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [
                translation(&server, "es_ES", "3.9.0", None),
                translation(&server, "es_ES", "4.1.0", None),
                translation(&server, "es_ES", "3.5.0", None),
            ]
        })))
        .mount(&server)
        .await;
    mount_pack(&server, "es_ES", "3.9.0", zip_bytes(&[("astra-es_ES.po", "hola")])).await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let descriptor = PackageDescriptor::new(PackageKind::Theme, "astra", "4.0.0");
    let report = translatable
        .process(&descriptor, &LocaleRequest::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.updated, vec!["es_ES"]);
    assert_eq!(
        fs::read_to_string(temp.path().join("themes/astra-es_ES.po")).unwrap(),
        "hola"
    );
}

#[tokio::test]
async fn test_core_update_event_uses_target_version() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/translations/core/1.0/"))
        .and(query_param("version", "6.4.2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [translation(&server, "de_DE", "6.4.2", None)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_pack(
        &server,
        "de_DE",
        "6.4.2",
        zip_bytes(&[("de_DE.po", "x"), ("admin-de_DE.po", "y")]),
    )
    .await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let event = PackageEvent::update(
        ComposerPackage::new("roots/wordpress", "package", "6.3.0.0"),
        ComposerPackage::new("roots/wordpress", "package", "6.4.2.0"),
    );
    let updated = translatable
        .on_package_action(&event, &CancellationToken::new())
        .await;

    assert_eq!(updated, vec!["de_DE"]);
    assert!(temp.path().join("de_DE.po").exists());
    assert!(temp.path().join("admin-de_DE.po").exists());
}

#[tokio::test]
async fn test_obsolete_files_removed_when_enabled() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let plugins = temp.path().join("plugins");
    fs::create_dir_all(&plugins).unwrap();
    fs::write(plugins.join("example-plugin-fr_FR-1a2b3c.json"), "{}").unwrap();
    fs::write(plugins.join("other-fr_FR.po"), "keep").unwrap();

    Mock::given(method("GET"))
        .and(path("/translations/plugins/1.0/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [translation(&server, "fr_FR", "2.1.0", None)]
        })))
        .mount(&server)
        .await;
    mount_pack(&server, "fr_FR", "2.1.0", zip_bytes(&[("example-plugin-fr_FR.po", "x")])).await;

    let config = config_for(&server, temp.path()).with_obsolete_policy(ObsoletePolicy::Remove);
    let translatable = Translatable::from_config(config).unwrap();
    translatable
        .process(&example_plugin(), &LocaleRequest::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!plugins.join("example-plugin-fr_FR-1a2b3c.json").exists());
    assert!(plugins.join("other-fr_FR.po").exists());
    assert!(plugins.join("example-plugin-fr_FR.po").exists());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_checksum_mismatch_writes_nothing() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let wrong_checksum = "0".repeat(64);

    Mock::given(method("GET"))
        .and(path("/translations/plugins/1.0/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [translation(&server, "fr_FR", "2.1.0", Some(wrong_checksum.as_str()))]
        })))
        .mount(&server)
        .await;
    mount_pack(&server, "fr_FR", "2.1.0", zip_bytes(&[("example-plugin-fr_FR.po", "x")])).await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let report = translatable
        .process(&example_plugin(), &LocaleRequest::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.updated.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].locale, "fr_FR");
    assert_eq!(report.failures[0].error.kind(), ErrorKind::Integrity);
    assert!(!temp.path().join("plugins/example-plugin-fr_FR.po").exists());
}

#[tokio::test]
async fn test_failed_download_does_not_stop_other_locales() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/translations/plugins/1.0/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [
                translation(&server, "fr_FR", "2.1.0", None),
                translation(&server, "nl_NL", "2.1.0", None),
            ]
        })))
        .mount(&server)
        .await;
    // nl_NL has no mounted pack: the download 404s.
    mount_pack(&server, "fr_FR", "2.1.0", zip_bytes(&[("example-plugin-fr_FR.po", "x")])).await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let report = translatable
        .process(&example_plugin(), &LocaleRequest::all(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.updated, vec!["fr_FR"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].locale, "nl_NL");
    assert_eq!(report.failures[0].error.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_api_server_error_fails_package() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/translations/plugins/1.0/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let err = translatable
        .process(&example_plugin(), &LocaleRequest::all(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(!temp.path().join("plugins").exists());
}

#[tokio::test]
async fn test_unrecognized_package_makes_no_requests() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let translatable = Translatable::from_config(config_for(&server, temp.path())).unwrap();
    let event = PackageEvent::install(ComposerPackage::new("monolog/monolog", "library", "3.5.0"));
    let updated = translatable
        .on_package_action(&event, &CancellationToken::new())
        .await;

    assert!(updated.is_empty());
}
