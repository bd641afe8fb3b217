// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Ventra workspace.
//!
//! Provides a wiremock-backed [`MockBackend`] pre-wired with the backend's
//! route shapes, plus typed and wire-shaped fixtures, so crate tests stay
//! focused on behavior.

pub mod backend;
pub mod fixtures;

pub use backend::MockBackend;
pub use fixtures::{
    conversation, conversation_row, list_response, message, message_row, paged, sse_body,
};
