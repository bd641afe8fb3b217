// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated REST client for the Ventra backend API.
//!
//! Wire DTOs are decoded into `ventra-core` types at this boundary; 401
//! responses raise a process-wide re-authentication signal instead of
//! failing individual calls silently.

pub mod auth;
pub mod client;
mod wire;

pub use auth::{AuthSignal, AuthSignalListener};
pub use client::{PagesParams, RestClient};
