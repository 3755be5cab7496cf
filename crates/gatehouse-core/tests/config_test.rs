//! Config loading: defaults, file IO, and validation error codes.

use std::io::Write;

use gatehouse_core::errors::error_code;
use gatehouse_core::{GateConfig, GateErrorCode};

#[test]
fn load_reads_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[routes]
sign_in = "/login"

[messages]
organization = "Select an organization"

[elevated]
role_name = "platform_admin"

[logging]
level = "debug"
json = true
"#
    )
    .unwrap();

    let config = GateConfig::load(file.path()).unwrap();
    assert_eq!(config.routes.sign_in, "/login");
    assert_eq!(config.routes.pricing, "/pricing");
    assert_eq!(config.messages.organization, "Select an organization");
    assert_eq!(config.messages.auth, "Loading...");
    assert_eq!(config.elevated.role_name, "platform_admin");
    assert!(config.logging.json);
}

#[test]
fn missing_file_reports_io_code() {
    let dir = tempfile::tempdir().unwrap();
    let err = GateConfig::load(&dir.path().join("gatehouse.toml")).unwrap_err();
    assert_eq!(err.error_code(), error_code::CONFIG_IO);
    assert!(err.to_string().contains("gatehouse.toml"));
}

#[test]
fn malformed_toml_reports_parse_code() {
    let err = GateConfig::from_toml("[routes\nsign_in = ").unwrap_err();
    assert_eq!(err.error_code(), error_code::CONFIG_PARSE);
}

#[test]
fn relative_redirect_reports_invalid_code() {
    let err = GateConfig::from_toml("[routes]\ndefault = \"home\"\n").unwrap_err();
    assert_eq!(err.error_code(), error_code::CONFIG_INVALID);
}

#[test]
fn config_roundtrips_through_toml() {
    let config = GateConfig::default();
    let text = toml::to_string(&config).unwrap();
    assert_eq!(GateConfig::from_toml(&text).unwrap(), config);
}
