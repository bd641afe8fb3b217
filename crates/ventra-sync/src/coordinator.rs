// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimistic send coordination.
//!
//! A send patches the message cache with a provisional entry before the
//! network round-trip, then reconciles: on success the entry is superseded
//! by an invalidation-triggered refetch of authoritative data, on failure
//! the cache is rolled back to the exact pre-patch snapshot. Either way no
//! provisional entry survives the settled send.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use ventra_core::{ConversationId, Message, PageId, VentraError};
use ventra_store::QueryStore;

/// Coordinates optimistic sends against the query store and REST client.
pub struct SendCoordinator {
    store: Arc<QueryStore>,
}

impl SendCoordinator {
    pub fn new(store: Arc<QueryStore>) -> Self {
        Self { store }
    }

    /// Send a reply with immediate local feedback.
    ///
    /// `text` must already be trimmed and non-empty; the coordinator never
    /// rewrites caller input, only its internal provisional copy.
    ///
    /// Sequence:
    /// 1. cancel any in-flight refetch of the conversation's messages, so
    ///    a late stale fetch cannot overwrite the patch;
    /// 2. patch the cached list with a provisional message, inserted in
    ///    sorted timestamp position (cache order is display order),
    ///    keeping a rollback snapshot;
    /// 3. issue the send;
    /// 4. success: invalidate the conversation's messages and the page's
    ///    conversation list; failure: restore the snapshot and rethrow.
    pub async fn send_with_optimistic_update(
        &self,
        page: &PageId,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), VentraError> {
        if text.trim().is_empty() {
            return Err(VentraError::Internal(
                "refusing to send an empty message".into(),
            ));
        }

        self.store.cancel_messages_fetch(page, conversation);

        let provisional = Message::provisional(conversation, page, text, Utc::now());
        debug!(
            conversation = %conversation.0,
            provisional_id = %provisional.id.0,
            "applying optimistic message patch"
        );
        let snapshot = self.store.patch_messages(page, conversation, |cached| {
            let at = cached
                .items
                .partition_point(|m| m.created_time <= provisional.created_time);
            cached.items.insert(at, provisional.clone());
            cached.total += 1;
        });

        match self.store.api().send_message(page, conversation, text).await {
            Ok(()) => {
                // The refetch these trigger carries the authoritative row
                // and replaces the provisional entry.
                self.store.invalidate_messages(page, conversation);
                self.store.invalidate_conversations(page);
                Ok(())
            }
            Err(e) => {
                warn!(conversation = %conversation.0, error = %e, "send failed, rolling back");
                self.store.restore_messages(snapshot);
                Err(e)
            }
        }
    }
}
