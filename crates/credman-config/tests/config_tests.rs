// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for settings loading and config input normalization.

use std::io::Write;

use credman_config::diagnostic::SettingsError;
use credman_config::model::CredmanConfig;
use credman_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_path, load_config_from_str,
};
use credman_core::InvalidConfig;
use secrecy::ExposeSecret;
use serial_test::serial;

const SCENARIO_JSON: &str = r#"{"username":"user", "password":"pass"}"#;
const SCENARIO_BASE64: &str = "eyJ1c2VybmFtZSI6InVzZXIiLCAicGFzc3dvcmQiOiJwYXNzIn0=";

#[test]
fn full_settings_file_deserializes() {
    let toml = r#"
[logging]
level = "debug"

[credential]
user_name = "svc-deploy"
"#;
    let config = load_config_from_str(toml).expect("valid TOML");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.credential.user_name.as_deref(), Some("svc-deploy"));
}

#[test]
fn unknown_key_is_reported_with_suggestion() {
    let toml = r#"
[logging]
levle = "debug"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            SettingsError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("an UnknownKey diagnostic");
    assert_eq!(unknown.0, "levle");
    assert_eq!(unknown.1.as_deref(), Some("level"));
}

#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[vault]\npath = \"x\"\n").expect_err("unknown section");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("vault"),
        "got: {err_str}"
    );
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[logging]\nlevel = 3\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, SettingsError::WrongType { .. })));
}

#[test]
fn validation_errors_surface_through_load() {
    let errors = load_and_validate_str("[logging]\nlevel = \"chatty\"\n").unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(
            e,
            SettingsError::Invalid { key: "logging.level", message } if message.contains("chatty")
        )));
}

#[test]
#[serial]
fn missing_file_is_silently_skipped() {
    let config = load_config_from_path(std::path::Path::new("/nonexistent/credman.toml"))
        .expect("missing file should fall back to defaults");
    assert_eq!(config.logging.level, "warn");
}

#[test]
#[serial]
fn env_var_overrides_file_value() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[credential]\nuser_name = \"from-file\"").unwrap();

    // SAFETY: serialized test; no other thread reads the environment concurrently.
    unsafe { std::env::set_var("CREDMAN_CREDENTIAL_USER_NAME", "from-env") };
    let result = load_and_validate_path(file.path());
    unsafe { std::env::remove_var("CREDMAN_CREDENTIAL_USER_NAME") };

    let config = result.expect("valid settings");
    assert_eq!(config.credential.user_name.as_deref(), Some("from-env"));
}

#[test]
#[serial]
fn env_var_maps_logging_level() {
    unsafe { std::env::set_var("CREDMAN_LOGGING_LEVEL", "info") };
    let result = load_config_from_path(std::path::Path::new("/nonexistent/credman.toml"));
    unsafe { std::env::remove_var("CREDMAN_LOGGING_LEVEL") };

    assert_eq!(result.unwrap().logging.level, "info");
}

#[test]
fn serialized_defaults_load_back() {
    let mut config = CredmanConfig::default();
    config.credential.user_name = Some("svc-deploy".to_string());
    let rendered = toml::to_string(&config).expect("settings serialize");

    let loaded = load_and_validate_str(&rendered).expect("rendered settings are valid");
    assert_eq!(loaded.logging.level, "warn");
    assert_eq!(loaded.credential.user_name.as_deref(), Some("svc-deploy"));
}

#[test]
fn defaults_are_sensible() {
    let config = CredmanConfig::default();
    assert_eq!(config.logging.level, "warn");
    assert!(config.credential.user_name.is_none());
}

#[test]
fn scenario_inline_json_produces_expected_base64() {
    let canonical = credman_config::parse(SCENARIO_JSON).unwrap();
    assert_eq!(canonical.expose_secret(), SCENARIO_BASE64);
}

#[test]
fn scenario_base64_is_unchanged() {
    let canonical = credman_config::parse(SCENARIO_BASE64).unwrap();
    assert_eq!(canonical.expose_secret(), SCENARIO_BASE64);
}

#[test]
fn scenario_invalid_string_is_rejected() {
    let err = credman_config::parse("invalidString").unwrap_err();
    assert!(matches!(err, InvalidConfig::ConfigString));
}

#[test]
fn config_file_with_json_payload_matches_inline_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCENARIO_JSON.as_bytes()).unwrap();
    let from_file = credman_config::parse(file.path().to_str().unwrap()).unwrap();
    let inline = credman_config::parse(SCENARIO_JSON).unwrap();
    assert_eq!(from_file.expose_secret(), inline.expose_secret());
}
