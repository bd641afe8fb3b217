// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed events on a page's live-update stream.
//!
//! The backend emits three named events per connection:
//! - `ready`: connection established, data is opaque
//! - `keepalive`: periodic ping, data is opaque
//! - `message-inserted`: JSON `{ "conversationId": "..." }`
//!
//! Unknown event names are skipped so the backend can add event types
//! without breaking older consoles.

use serde::Deserialize;

use ventra_core::{ConversationId, VentraError};

/// A decoded live-update event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    /// Connection established. Informational.
    Ready,
    /// Periodic ping. Informational.
    KeepAlive,
    /// A message landed in a conversation on this page.
    MessageInserted { conversation: ConversationId },
}

#[derive(Debug, Deserialize)]
struct MessageInsertedPayload {
    #[serde(rename = "conversationId")]
    conversation_id: String,
}

/// Decode one named SSE event. `Ok(None)` means an unknown event name that
/// should be skipped; `Err` means a recognized event with a malformed
/// payload (the caller logs and drops it).
pub fn parse_event(name: &str, data: &str) -> Result<Option<LiveEvent>, VentraError> {
    match name {
        "ready" => Ok(Some(LiveEvent::Ready)),
        "keepalive" => Ok(Some(LiveEvent::KeepAlive)),
        "message-inserted" => {
            let payload: MessageInsertedPayload = serde_json::from_str(data)
                .map_err(|e| VentraError::Decode(format!("message-inserted payload: {e}")))?;
            Ok(Some(LiveEvent::MessageInserted {
                conversation: ConversationId(payload.conversation_id),
            }))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_and_keepalive_carry_no_payload() {
        assert_eq!(parse_event("ready", "ok").unwrap(), Some(LiveEvent::Ready));
        assert_eq!(
            parse_event("keepalive", "ping").unwrap(),
            Some(LiveEvent::KeepAlive)
        );
    }

    #[test]
    fn message_inserted_decodes_conversation_id() {
        let event = parse_event("message-inserted", r#"{"conversationId":"c42"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            LiveEvent::MessageInserted {
                conversation: ConversationId("c42".into())
            }
        );
    }

    #[test]
    fn malformed_payload_is_an_error_not_a_panic() {
        assert!(parse_event("message-inserted", "{oops").is_err());
        assert!(parse_event("message-inserted", r#"{"wrong":"shape"}"#).is_err());
    }

    #[test]
    fn unknown_event_names_are_skipped() {
        assert_eq!(parse_event("conversation-updated", "{}").unwrap(), None);
    }
}
