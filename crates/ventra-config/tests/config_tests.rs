// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Ventra configuration system.

use ventra_config::load_config_from_str;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_ventra_config() {
    let toml = r#"
[backend]
base_url = "https://console.example.com"
group_prefix = "meta"
timeout_secs = 10

[live]
initial_backoff_ms = 500
max_backoff_ms = 15000
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.backend.base_url, "https://console.example.com");
    assert_eq!(config.backend.group_prefix, "meta");
    assert_eq!(config.backend.timeout_secs, 10);
    assert_eq!(config.live.initial_backoff_ms, 500);
    assert_eq!(config.live.max_backoff_ms, 15_000);
    assert_eq!(config.backend.api_base(), "https://console.example.com/meta");
}

/// Unknown field in [backend] produces an error.
#[test]
fn unknown_field_in_backend_produces_error() {
    let toml = r#"
[backend]
base_ulr = "https://example.com"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("base_ulr"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing sections use compiled defaults without error.
#[test]
fn empty_config_uses_defaults() {
    let config = load_config_from_str("").expect("empty config should be valid");
    assert_eq!(config.backend.api_base(), "http://localhost:8787/meta");
    assert_eq!(config.live.initial_backoff_ms, 1_000);
}

/// Partial sections keep defaults for unspecified fields.
#[test]
fn partial_backend_section_keeps_other_defaults() {
    let toml = r#"
[backend]
base_url = "https://console.example.com"
"#;

    let config = load_config_from_str(toml).expect("partial section should be valid");
    assert_eq!(config.backend.base_url, "https://console.example.com");
    assert_eq!(config.backend.group_prefix, "meta");
    assert_eq!(config.backend.timeout_secs, 30);
}
