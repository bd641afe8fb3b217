// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ventra sync layer.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Ventra configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VentraConfig {
    /// Backend API endpoint settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Live-update (SSE) connection settings.
    #[serde(default)]
    pub live: LiveConfig,
}

/// Backend API endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route group prefix under which the messaging endpoints live.
    #[serde(default = "default_group_prefix")]
    pub group_prefix: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Full API base: base URL joined with the group prefix, no trailing slash.
    pub fn api_base(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.group_prefix.trim_matches('/')
        )
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            group_prefix: default_group_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Live-update (SSE) connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LiveConfig {
    /// Delay before the first reconnect attempt, in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound on the reconnect delay, in milliseconds.
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8787".to_string()
}

fn default_group_prefix() -> String {
    "meta".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_initial_backoff_ms() -> u64 {
    1_000
}

fn default_max_backoff_ms() -> u64 {
    30_000
}
