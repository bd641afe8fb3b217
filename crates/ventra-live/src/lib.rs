// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-update channel manager for the Ventra sync layer.
//!
//! Maintains one shared SSE connection per messaging page, reference
//! counted across consumers, and routes inbound events to cache
//! invalidation so views re-render with fresh data.

pub mod events;
pub mod pool;

pub use events::LiveEvent;
pub use pool::{LiveHandle, LiveUpdates};
