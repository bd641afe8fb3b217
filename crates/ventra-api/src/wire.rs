// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire DTOs for the backend REST API and their decode into domain types.
//!
//! The backend stores sender descriptors and attachments as JSON-encoded
//! strings inside the row; they are decoded exactly once here, at the
//! cache-write boundary, so the store and the rules never see raw JSON.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use ventra_core::{
    AgentMode, Attachment, Conversation, ConversationId, Message, MessageId, Page, PageId, Paged,
    Sender, VentraError,
};

/// Envelope shared by the backend's list endpoints:
/// `{ success, data: [...], meta: { total, page, limit } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[allow(dead_code)]
    pub success: bool,
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListMeta {
    pub total: u64,
}

/// A stored message row as the backend returns it.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageDto {
    pub id: String,
    pub conversation_id: String,
    pub created_time: DateTime<Utc>,
    pub message: String,
    pub from: serde_json::Value,
    #[serde(default)]
    pub attachments: Option<serde_json::Value>,
}

impl MessageDto {
    pub fn decode(self) -> Result<Message, VentraError> {
        Ok(Message {
            id: MessageId(self.id),
            conversation_id: ConversationId(self.conversation_id),
            created_time: self.created_time,
            text: self.message,
            sender: decode_sender(&self.from)?,
            attachments: decode_attachments(self.attachments.as_ref()),
            optimistic: false,
        })
    }
}

/// A stored conversation row as the backend returns it.
#[derive(Debug, Deserialize)]
pub(crate) struct ConversationDto {
    pub id: String,
    #[serde(rename = "recipientId", default)]
    pub recipient_id: String,
    #[serde(rename = "recipientName", default)]
    pub recipient_name: String,
    #[serde(rename = "agentmode")]
    pub agent_mode: AgentMode,
    #[serde(rename = "isConfirmOrder", default)]
    pub is_confirm_order: bool,
}

impl ConversationDto {
    pub fn decode(self) -> Conversation {
        Conversation {
            id: ConversationId(self.id),
            recipient_id: self.recipient_id,
            recipient_name: self.recipient_name,
            agent_mode: self.agent_mode,
            order_confirmed: self.is_confirm_order,
        }
    }
}

/// A stored page row. The numeric database id is ignored; the platform
/// page id is the identity the sync layer keys on.
#[derive(Debug, Deserialize)]
pub(crate) struct PageDto {
    pub page_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl PageDto {
    pub fn decode(self) -> Page {
        Page {
            id: PageId(self.page_id),
            name: self.name,
            category: self.category,
        }
    }
}

/// Sender descriptors arrive either as a JSON-encoded string (stored rows)
/// or as an inline object (newer backend revisions). Both are accepted.
fn decode_sender(from: &serde_json::Value) -> Result<Sender, VentraError> {
    match from {
        serde_json::Value::String(inner) => serde_json::from_str(inner)
            .map_err(|e| VentraError::Decode(format!("sender descriptor: {e}"))),
        other => serde_json::from_value(other.clone())
            .map_err(|e| VentraError::Decode(format!("sender descriptor: {e}"))),
    }
}

/// Attachments are optional and, like senders, may be string-encoded.
/// An undecodable payload is dropped with a log line rather than failing
/// the whole message list.
fn decode_attachments(raw: Option<&serde_json::Value>) -> Vec<Attachment> {
    let Some(value) = raw else {
        return Vec::new();
    };
    let parsed = match value {
        serde_json::Value::Null => return Vec::new(),
        serde_json::Value::String(inner) => serde_json::from_str(inner),
        other => serde_json::from_value(other.clone()),
    };
    match parsed {
        Ok(attachments) => attachments,
        Err(e) => {
            debug!(error = %e, "dropping undecodable attachments payload");
            Vec::new()
        }
    }
}

/// Decode a message list response, normalizing order to ascending
/// `created_time`. Cache order is display order; consumers do not re-sort.
pub(crate) fn decode_messages(
    response: ListResponse<MessageDto>,
) -> Result<Paged<Message>, VentraError> {
    let total = response
        .meta
        .as_ref()
        .map(|m| m.total)
        .unwrap_or(response.data.len() as u64);
    let mut items = response
        .data
        .into_iter()
        .map(MessageDto::decode)
        .collect::<Result<Vec<_>, _>>()?;
    items.sort_by_key(|m| m.created_time);
    Ok(Paged { items, total })
}

/// Decode a conversation list response. Order is backend-defined and kept
/// as delivered; it is re-derived on every invalidation-triggered refetch.
pub(crate) fn decode_conversations(
    response: ListResponse<ConversationDto>,
) -> Paged<Conversation> {
    let total = response
        .meta
        .as_ref()
        .map(|m| m.total)
        .unwrap_or(response.data.len() as u64);
    let items = response
        .data
        .into_iter()
        .map(ConversationDto::decode)
        .collect();
    Paged { items, total }
}

/// Decode a stored-pages list response.
pub(crate) fn decode_pages(response: ListResponse<PageDto>) -> Paged<Page> {
    let total = response
        .meta
        .as_ref()
        .map(|m| m.total)
        .unwrap_or(response.data.len() as u64);
    let items = response.data.into_iter().map(PageDto::decode).collect();
    Paged { items, total }
}
