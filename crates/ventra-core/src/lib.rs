// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Ventra conversation-sync layer.
//!
//! This crate provides the typed domain model, the shared error type, and
//! the client-side messaging-policy rules used throughout the workspace.

pub mod error;
pub mod rules;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VentraError;
pub use types::{
    AgentMode, Attachment, Conversation, ConversationId, Message, MessageId, Page, PageId, Paged,
    Sender, TEMP_ID_PREFIX,
};
