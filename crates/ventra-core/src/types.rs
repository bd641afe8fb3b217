// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Ventra workspace.
//!
//! Wire payloads are decoded into these structs once, at the API boundary;
//! everything past that point (store, rules, coordinators) works with typed
//! values only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Prefix carried by provisional (client-generated) message identifiers.
/// Server-assigned identifiers never start with it.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Identifier of a messaging page (one external platform channel).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub String);

/// Identifier of a conversation thread between a page and one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

/// Identifier of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Who replies in a conversation: the automated agent or a human operator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgentMode {
    Auto,
    Manual,
}

/// Sender descriptor attached to every message.
///
/// Arrives on the wire as a JSON-encoded string; decoded once by the API
/// layer. A sender whose id equals the page id is the page itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A message attachment. Payloads beyond kind and url are not interpreted
/// by the sync layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A single chat line within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub created_time: DateTime<Utc>,
    pub text: String,
    pub sender: Sender,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Set only on client-held provisional entries. Never persisted, never
    /// sent to the server.
    #[serde(skip)]
    pub optimistic: bool,
}

impl Message {
    /// Synthesizes the provisional message inserted into the cache while a
    /// send is in flight. Outgoing replies are always from the page itself.
    pub fn provisional(
        conversation: &ConversationId,
        page: &PageId,
        text: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId(format!("{TEMP_ID_PREFIX}{}", now.timestamp_millis())),
            conversation_id: conversation.clone(),
            created_time: now,
            text: text.to_string(),
            sender: Sender {
                id: page.0.clone(),
                name: "You".to_string(),
            },
            attachments: Vec::new(),
            optimistic: true,
        }
    }

    /// True when this message came from the page rather than the external
    /// recipient.
    pub fn is_from_page(&self, page: &PageId) -> bool {
        self.sender.id == page.0
    }
}

/// A conversation thread as cached from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub recipient_id: String,
    pub recipient_name: String,
    pub agent_mode: AgentMode,
    pub order_confirmed: bool,
}

/// A messaging page registered with the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    pub category: String,
}

/// The "list + total" shape shared by message and conversation caches.
///
/// `total` counts server-side entities and may exceed `items.len()` when the
/// backend paginates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
