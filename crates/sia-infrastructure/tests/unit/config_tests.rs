//! Tests for layered configuration loading and validation
//!
//! File-based tests write their TOML through `tempfile` and point the
//! loader at it explicitly, so they run in parallel without touching
//! the process environment. The environment-variable tests mutate
//! `SIA_`-prefixed variables and therefore run ignored by default:
//!
//! ```bash
//! cargo test -p sia-infrastructure --test unit config -- --test-threads=1 --ignored
//! ```

use sia_domain::error::Error;
use sia_infrastructure::ConfigLoader;
use sia_infrastructure::config::LogFormat;
use std::io::Write;

fn temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file should create");
    file.write_all(contents.as_bytes())
        .expect("temp file should write");
    file
}

#[test]
fn test_defaults_load_without_any_file() {
    let config = ConfigLoader::new()
        .load()
        .expect("defaults should validate");

    assert_eq!(config.auth.jwt.secret, "");
    assert_eq!(config.auth.jwt.issuer, "sia-core");
    assert_eq!(config.auth.jwt.audience, "sia-clients");
    assert_eq!(config.auth.jwt.expiry_minutes, 60);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Compact);
}

#[test]
fn test_toml_file_overrides_defaults() {
    let file = temp_config(
        r#"
[auth.jwt]
secret = "un-secreto-de-al-menos-treinta-y-dos-bytes"
expiry_minutes = 120

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .load()
        .expect("file config should load");

    assert_eq!(
        config.auth.jwt.secret,
        "un-secreto-de-al-menos-treinta-y-dos-bytes"
    );
    assert_eq!(config.auth.jwt.expiry_minutes, 120);
    // Untouched fields keep their defaults
    assert_eq!(config.auth.jwt.issuer, "sia-core");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_weak_secret_is_refused() {
    let file = temp_config("[auth.jwt]\nsecret = \"corto\"\n");

    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load()
        .expect_err("a short secret should fail validation");
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("32"));
}

#[test]
fn test_unknown_log_level_is_refused() {
    let file = temp_config("[logging]\nlevel = \"ruidoso\"\n");

    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load()
        .expect_err("an unknown level should fail validation");
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_nonpositive_expiry_is_refused() {
    let file = temp_config("[auth.jwt]\nexpiry_minutes = 0\n");

    assert!(
        ConfigLoader::new()
            .with_config_path(file.path())
            .load()
            .is_err()
    );
}

#[test]
fn test_config_path_accessor_reports_the_explicit_path() {
    let loader = ConfigLoader::new().with_config_path("config/custom.toml");
    assert_eq!(
        loader.config_path(),
        Some(std::path::Path::new("config/custom.toml"))
    );
    assert!(ConfigLoader::new().config_path().is_none());
}

/// Helper to set env vars; tests using it must run with --test-threads=1
fn set_env(key: &str, value: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        std::env::set_var(key, value);
    }
}

/// Helper to remove env vars; tests using it must run with --test-threads=1
fn remove_env(key: &str) {
    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        std::env::remove_var(key);
    }
}

/// Verify `SIA_` variables override the file layer with `__` splitting
///
/// Run with: `cargo test -p sia-infrastructure --test unit config -- --test-threads=1 --ignored`
#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_vars_override_the_file_layer() {
    let file = temp_config("[auth.jwt]\nexpiry_minutes = 120\n");
    set_env("SIA_AUTH__JWT__EXPIRY_MINUTES", "90");
    set_env("SIA_LOGGING__LEVEL", "warn");

    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .load()
        .expect("env-over-file config should load");

    assert_eq!(config.auth.jwt.expiry_minutes, 90);
    assert_eq!(config.logging.level, "warn");

    remove_env("SIA_AUTH__JWT__EXPIRY_MINUTES");
    remove_env("SIA_LOGGING__LEVEL");
}

/// Verify an unrelated prefix is ignored
///
/// Run with: `cargo test -p sia-infrastructure --test unit config -- --test-threads=1 --ignored`
#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_foreign_prefixes_are_not_loaded() {
    set_env("OTHER_AUTH__JWT__EXPIRY_MINUTES", "15");

    let config = ConfigLoader::new().load().expect("defaults should load");
    assert_eq!(config.auth.jwt.expiry_minutes, 60);

    remove_env("OTHER_AUTH__JWT__EXPIRY_MINUTES");
}
