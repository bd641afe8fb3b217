// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Ventra synchronization layer.

use thiserror::Error;

/// The primary error type used across the Ventra workspace.
#[derive(Debug, Error)]
pub enum VentraError {
    /// Configuration errors (invalid TOML, missing required fields, bad URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level errors (connection refused, request build failure, stream drop).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Non-2xx REST response, carrying the status and a best-effort message
    /// extracted from the response body.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 401. Raised after the process-wide re-authentication signal fires.
    #[error("not authenticated")]
    Unauthorized,

    /// A wire payload (REST body, SSE event data, sender descriptor) failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
