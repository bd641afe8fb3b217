// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed and wire-shaped fixtures for conversations and messages.

use chrono::{DateTime, Utc};

use ventra_core::{
    AgentMode, Conversation, ConversationId, Message, MessageId, Paged, Sender,
};

/// A typed message fixture.
pub fn message(
    id: &str,
    conversation: &str,
    sender_id: &str,
    text: &str,
    created: DateTime<Utc>,
) -> Message {
    Message {
        id: MessageId(id.into()),
        conversation_id: ConversationId(conversation.into()),
        created_time: created,
        text: text.into(),
        sender: Sender {
            id: sender_id.into(),
            name: "Someone".into(),
        },
        attachments: Vec::new(),
        optimistic: false,
    }
}

/// A typed conversation fixture.
pub fn conversation(id: &str, recipient_name: &str) -> Conversation {
    Conversation {
        id: ConversationId(id.into()),
        recipient_id: format!("{id}-recipient"),
        recipient_name: recipient_name.into(),
        agent_mode: AgentMode::Auto,
        order_confirmed: false,
    }
}

/// Wrap items in the "list + total" cache shape, with total = item count.
pub fn paged<T>(items: Vec<T>) -> Paged<T> {
    let total = items.len() as u64;
    Paged { items, total }
}

/// A message row in the backend's wire shape (sender descriptor as a
/// JSON-encoded string).
pub fn message_row(
    id: &str,
    conversation: &str,
    sender_id: &str,
    text: &str,
    created: DateTime<Utc>,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "conversation_id": conversation,
        "created_time": created.to_rfc3339(),
        "message": text,
        "from": format!("{{\"id\":\"{sender_id}\",\"name\":\"Someone\"}}"),
        "attachments": null
    })
}

/// A conversation row in the backend's wire shape.
pub fn conversation_row(id: &str, recipient_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "recipientId": format!("{id}-recipient"),
        "recipientName": recipient_name,
        "agentmode": "auto",
        "isConfirmOrder": false
    })
}

/// The backend's list-response envelope.
pub fn list_response(rows: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": rows,
        "meta": { "total": total, "page": 1, "limit": 50 }
    })
}

/// A raw SSE body from (event name, data) pairs, in wire framing.
pub fn sse_body(events: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, data) in events {
        body.push_str(&format!("event: {name}\ndata: {data}\n\n"));
    }
    body
}
