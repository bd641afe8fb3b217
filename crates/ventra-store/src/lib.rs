// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-addressed query/cache store for the Ventra sync layer.
//!
//! Entries are keyed by semantic paths (pages, page conversations,
//! conversation messages) and support invalidation, typed patch/rollback,
//! and advisory cancellation of in-flight fetches.

pub mod store;

pub use store::{MessagesSnapshot, QueryStore};
