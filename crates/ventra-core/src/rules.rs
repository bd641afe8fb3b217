// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side messaging-policy rules.
//!
//! The platform only allows a page to reply within 24 hours of the last
//! inbound message from the external recipient. Views evaluate this before
//! invoking the send coordinator, so a disallowed send never reaches the
//! network.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Message, PageId};

/// Length of the platform reply window.
pub const REPLY_WINDOW_HOURS: i64 = 24;

/// Timestamp of the newest message sent by the external recipient (any
/// sender other than the page itself). `None` when the recipient has never
/// written.
pub fn latest_contact_activity(messages: &[Message], page: &PageId) -> Option<DateTime<Utc>> {
    messages
        .iter()
        .filter(|m| !m.is_from_page(page))
        .map(|m| m.created_time)
        .max()
}

/// Whether the page may still reply into this conversation at `now`.
///
/// A conversation with no inbound message at all is closed: the window only
/// opens when the recipient writes.
pub fn reply_window_open(messages: &[Message], page: &PageId, now: DateTime<Utc>) -> bool {
    match latest_contact_activity(messages, page) {
        Some(last) => now - last < Duration::hours(REPLY_WINDOW_HOURS),
        None => false,
    }
}
