// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The query/cache store.
//!
//! Server data is cached under semantic keys (pages, a page's
//! conversations, a conversation's messages). Each entry carries typed
//! data, a freshness flag, and a fetch epoch:
//!
//! - *Invalidation* marks an entry stale; the next read-through refetches
//!   while the stale value stays readable.
//! - *Epochs* implement advisory fetch cancellation: a fetch records the
//!   epoch it started under and its result is discarded if the epoch moved
//!   (someone called `cancel_messages_fetch` in between). This is what
//!   keeps a late-arriving stale fetch from overwriting an optimistic
//!   patch.
//! - *Patches* go through [`QueryStore::patch_messages`], which returns a
//!   snapshot of the pre-patch state; [`QueryStore::restore_messages`]
//!   rolls back to exactly that state.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tracing::{debug, trace};

use ventra_api::RestClient;
use ventra_core::{Conversation, ConversationId, Message, Page, PageId, Paged, VentraError};

#[derive(Debug)]
struct CacheEntry<T> {
    data: Option<T>,
    fresh: bool,
    epoch: u64,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            data: None,
            fresh: false,
            epoch: 0,
        }
    }
}

type MessageKey = (PageId, ConversationId);

/// Rollback token returned by [`QueryStore::patch_messages`].
///
/// Captures the complete pre-patch entry state; restoring it reproduces
/// that state exactly, so a failed optimistic send leaves no trace.
#[derive(Debug, Clone)]
pub struct MessagesSnapshot {
    page: PageId,
    conversation: ConversationId,
    data: Option<Paged<Message>>,
    fresh: bool,
}

/// Key-addressed cache of server data with read-through fetching.
///
/// All entry mutations take the entry lock once and never await while
/// holding it, so check-and-mutate sequences are single uninterrupted
/// steps.
pub struct QueryStore {
    api: Arc<RestClient>,
    pages: Mutex<CacheEntry<Paged<Page>>>,
    conversations: DashMap<PageId, CacheEntry<Paged<Conversation>>>,
    messages: DashMap<MessageKey, CacheEntry<Paged<Message>>>,
}

impl QueryStore {
    pub fn new(api: Arc<RestClient>) -> Self {
        Self {
            api,
            pages: Mutex::new(CacheEntry::default()),
            conversations: DashMap::new(),
            messages: DashMap::new(),
        }
    }

    /// The REST client this store reads through.
    pub fn api(&self) -> &Arc<RestClient> {
        &self.api
    }

    // --- Messages ---

    /// Serve a conversation's messages from cache, or fetch from the
    /// backend when missing or stale.
    pub async fn messages(
        &self,
        page: &PageId,
        conversation: &ConversationId,
    ) -> Result<Paged<Message>, VentraError> {
        let key = (page.clone(), conversation.clone());
        let begin_epoch = {
            let entry = self.messages.entry(key.clone()).or_default();
            if entry.fresh
                && let Some(data) = &entry.data
            {
                trace!(conversation = %conversation.0, "messages served from cache");
                return Ok(data.clone());
            }
            entry.epoch
        };

        let fetched = self.api.conversation_messages(page, conversation).await?;

        {
            let mut entry = self.messages.entry(key).or_default();
            if entry.epoch == begin_epoch {
                entry.data = Some(fetched.clone());
                entry.fresh = true;
            } else {
                debug!(
                    conversation = %conversation.0,
                    "discarding superseded message fetch result"
                );
            }
        }
        Ok(fetched)
    }

    /// Current cached messages, if any, without fetching.
    pub fn read_messages(
        &self,
        page: &PageId,
        conversation: &ConversationId,
    ) -> Option<Paged<Message>> {
        self.messages
            .get(&(page.clone(), conversation.clone()))
            .and_then(|entry| entry.data.clone())
    }

    /// Install fetched message data directly and mark the entry fresh.
    pub fn write_messages(
        &self,
        page: &PageId,
        conversation: &ConversationId,
        data: Paged<Message>,
    ) {
        let mut entry = self
            .messages
            .entry((page.clone(), conversation.clone()))
            .or_default();
        entry.data = Some(data);
        entry.fresh = true;
    }

    /// Apply a typed patch to a conversation's cached messages, returning a
    /// snapshot of the pre-patch state for rollback.
    ///
    /// When nothing is cached yet the patch has nothing to rewrite and is
    /// skipped; the snapshot still restores that empty state.
    pub fn patch_messages(
        &self,
        page: &PageId,
        conversation: &ConversationId,
        patch: impl FnOnce(&mut Paged<Message>),
    ) -> MessagesSnapshot {
        let mut entry = self
            .messages
            .entry((page.clone(), conversation.clone()))
            .or_default();
        let snapshot = MessagesSnapshot {
            page: page.clone(),
            conversation: conversation.clone(),
            data: entry.data.clone(),
            fresh: entry.fresh,
        };
        if let Some(data) = entry.data.as_mut() {
            patch(data);
        }
        snapshot
    }

    /// Roll a conversation's message entry back to a snapshot taken by
    /// [`QueryStore::patch_messages`].
    pub fn restore_messages(&self, snapshot: MessagesSnapshot) {
        debug!(conversation = %snapshot.conversation.0, "rolling back message cache entry");
        let mut entry = self
            .messages
            .entry((snapshot.page, snapshot.conversation))
            .or_default();
        entry.data = snapshot.data;
        entry.fresh = snapshot.fresh;
    }

    /// Advisory cancellation of any in-flight message fetch for this
    /// conversation: results of fetches begun before this call are dropped
    /// when they land.
    pub fn cancel_messages_fetch(&self, page: &PageId, conversation: &ConversationId) {
        let mut entry = self
            .messages
            .entry((page.clone(), conversation.clone()))
            .or_default();
        entry.epoch += 1;
    }

    /// Mark a conversation's messages stale. Cached data stays readable
    /// until the refetch replaces it.
    pub fn invalidate_messages(&self, page: &PageId, conversation: &ConversationId) {
        debug!(conversation = %conversation.0, "invalidating conversation messages");
        let mut entry = self
            .messages
            .entry((page.clone(), conversation.clone()))
            .or_default();
        entry.fresh = false;
    }

    /// Whether the message entry exists and is fresh.
    pub fn messages_fresh(&self, page: &PageId, conversation: &ConversationId) -> bool {
        self.messages
            .get(&(page.clone(), conversation.clone()))
            .map(|entry| entry.fresh)
            .unwrap_or(false)
    }

    // --- Conversations ---

    /// Serve a page's conversation list from cache, or fetch when missing
    /// or stale.
    pub async fn conversations(&self, page: &PageId) -> Result<Paged<Conversation>, VentraError> {
        let begin_epoch = {
            let entry = self.conversations.entry(page.clone()).or_default();
            if entry.fresh
                && let Some(data) = &entry.data
            {
                trace!(page = %page.0, "conversations served from cache");
                return Ok(data.clone());
            }
            entry.epoch
        };

        let fetched = self.api.page_conversations(page).await?;

        {
            let mut entry = self.conversations.entry(page.clone()).or_default();
            if entry.epoch == begin_epoch {
                entry.data = Some(fetched.clone());
                entry.fresh = true;
            } else {
                debug!(page = %page.0, "discarding superseded conversation fetch result");
            }
        }
        Ok(fetched)
    }

    /// Current cached conversation list, if any, without fetching.
    pub fn read_conversations(&self, page: &PageId) -> Option<Paged<Conversation>> {
        self.conversations
            .get(page)
            .and_then(|entry| entry.data.clone())
    }

    /// Install fetched conversation data directly and mark the entry fresh.
    pub fn write_conversations(&self, page: &PageId, data: Paged<Conversation>) {
        let mut entry = self.conversations.entry(page.clone()).or_default();
        entry.data = Some(data);
        entry.fresh = true;
    }

    /// Mark a page's conversation list stale.
    pub fn invalidate_conversations(&self, page: &PageId) {
        debug!(page = %page.0, "invalidating page conversations");
        let mut entry = self.conversations.entry(page.clone()).or_default();
        entry.fresh = false;
    }

    /// Whether the conversation-list entry exists and is fresh.
    pub fn conversations_fresh(&self, page: &PageId) -> bool {
        self.conversations
            .get(page)
            .map(|entry| entry.fresh)
            .unwrap_or(false)
    }

    // --- Pages ---

    /// Serve the stored-pages list from cache, or fetch when missing or
    /// stale. The listing is fetched unpaginated here; callers needing
    /// pagination go through the REST client directly.
    pub async fn pages(&self) -> Result<Paged<Page>, VentraError> {
        let begin_epoch = {
            let entry = self.pages.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if entry.fresh
                && let Some(data) = &entry.data
            {
                trace!("pages served from cache");
                return Ok(data.clone());
            }
            entry.epoch
        };

        let fetched = self.api.stored_pages(&Default::default()).await?;

        {
            let mut entry = self.pages.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if entry.epoch == begin_epoch {
                entry.data = Some(fetched.clone());
                entry.fresh = true;
            } else {
                debug!("discarding superseded pages fetch result");
            }
        }
        Ok(fetched)
    }

    /// Mark the stored-pages list stale (after page upsert/delete/sync).
    pub fn invalidate_pages(&self) {
        debug!("invalidating stored pages");
        let mut entry = self.pages.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entry.fresh = false;
    }

    /// Whether the pages entry is fresh.
    pub fn pages_fresh(&self) -> bool {
        self.pages.lock().unwrap_or_else(std::sync::PoisonError::into_inner).fresh
    }

    // --- Mutations ---
    //
    // Every confirmed mutation invalidates each entry that could hold a
    // view of the affected entity, so no view observes a permanently stale
    // result.

    /// Remove a page from the console and invalidate the stored-pages list.
    pub async fn delete_page(&self, page: &PageId) -> Result<(), VentraError> {
        self.api.delete_page(page).await?;
        self.invalidate_pages();
        Ok(())
    }

    /// Trigger a backend conversation sync for a page, then invalidate the
    /// page's conversation list so the next read picks up imported rows.
    pub async fn sync_page_conversations(&self, page: &PageId) -> Result<(), VentraError> {
        self.api.sync_page_conversations(page).await?;
        self.invalidate_conversations(page);
        Ok(())
    }
}
