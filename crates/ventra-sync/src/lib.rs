// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimistic send coordinator for the Ventra sync layer.
//!
//! Gives the sender immediate feedback when posting a message while
//! guaranteeing the cache never retains an invalid provisional entry after
//! the network round-trip completes.

pub mod coordinator;

pub use coordinator::SendCoordinator;
