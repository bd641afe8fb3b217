// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference-counted pool of live-update connections.
//!
//! At most one SSE connection exists per page id, no matter how many
//! consumers subscribed. The connection is opened when the first consumer
//! subscribes and closed exactly when the last one releases its handle.
//!
//! Reconnection is silent and unbounded: the reader retries with
//! exponential backoff capped by configuration, resetting once a
//! connection delivers an event. There is no user-facing failure surface;
//! a persistent outage shows up only in the logs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use ventra_config::{BackendConfig, LiveConfig};
use ventra_core::{PageId, VentraError};
use ventra_store::QueryStore;

use crate::events::{LiveEvent, parse_event};

struct PoolEntry {
    refcount: usize,
    stop: CancellationToken,
}

/// Owner of all live-update connections.
///
/// Constructed once at startup and shared by `Arc`; every component that
/// wants live updates for a page calls [`LiveUpdates::subscribe`].
pub struct LiveUpdates {
    store: Arc<QueryStore>,
    http: reqwest::Client,
    base_url: String,
    initial_backoff: Duration,
    max_backoff: Duration,
    pool: Mutex<HashMap<PageId, PoolEntry>>,
}

impl LiveUpdates {
    /// Build the pool service. No connection is opened until the first
    /// subscription.
    pub fn new(
        store: Arc<QueryStore>,
        backend: &BackendConfig,
        live: &LiveConfig,
    ) -> Result<Arc<Self>, VentraError> {
        // No overall timeout: the stream is long-lived and quiet periods
        // are expected (keepalives aside). Only connecting is bounded.
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VentraError::Transport {
                message: format!("failed to build SSE client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Arc::new(Self {
            store,
            http,
            base_url: backend.api_base(),
            initial_backoff: Duration::from_millis(live.initial_backoff_ms),
            max_backoff: Duration::from_millis(live.max_backoff_ms),
            pool: Mutex::new(HashMap::new()),
        }))
    }

    /// Subscribe a consumer to a page's live updates.
    ///
    /// Returns an inert handle when `enabled` is false or the page id is
    /// empty. Otherwise the page's shared connection is created (refcount
    /// 1) or joined (refcount + 1). The check and the count mutation
    /// happen under one lock with no await, so concurrent subscribers can
    /// never race a second connection into existence.
    pub fn subscribe(self: &Arc<Self>, page: &PageId, enabled: bool) -> LiveHandle {
        if !enabled || page.0.is_empty() {
            return LiveHandle { subscription: None };
        }

        let mut pool = self.lock_pool();
        match pool.get_mut(page) {
            Some(entry) => {
                entry.refcount += 1;
                trace!(page = %page.0, refcount = entry.refcount, "joined existing live connection");
            }
            None => {
                let stop = CancellationToken::new();
                let url = format!("{}/pages/{}/sse", self.base_url, page.0);
                debug!(page = %page.0, "opening live connection");
                tokio::spawn(run_reader(
                    Arc::clone(&self.store),
                    self.http.clone(),
                    url,
                    page.clone(),
                    self.initial_backoff,
                    self.max_backoff,
                    stop.clone(),
                ));
                pool.insert(page.clone(), PoolEntry { refcount: 1, stop });
            }
        }
        drop(pool);

        LiveHandle {
            subscription: Some((page.clone(), Arc::clone(self))),
        }
    }

    /// Number of open connections across all pages.
    pub fn connection_count(&self) -> usize {
        self.lock_pool().len()
    }

    /// Number of consumers currently subscribed to a page (0 when no
    /// connection exists).
    pub fn subscriber_count(&self, page: &PageId) -> usize {
        self.lock_pool().get(page).map(|e| e.refcount).unwrap_or(0)
    }

    fn release(&self, page: &PageId) {
        let mut pool = self.lock_pool();
        let Some(entry) = pool.get_mut(page) else {
            return;
        };
        entry.refcount -= 1;
        if entry.refcount == 0 {
            debug!(page = %page.0, "last subscriber gone, closing live connection");
            entry.stop.cancel();
            pool.remove(page);
        }
    }

    fn lock_pool(&self) -> std::sync::MutexGuard<'_, HashMap<PageId, PoolEntry>> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A consumer's claim on a page's shared live connection.
///
/// Releasing (or dropping) the handle decrements the refcount exactly
/// once: the claim is consumed on first release, so calling it again is a
/// no-op.
pub struct LiveHandle {
    subscription: Option<(PageId, Arc<LiveUpdates>)>,
}

impl LiveHandle {
    /// Whether this handle actually holds a subscription (false for inert
    /// handles and after release).
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Give up this consumer's interest in the page. Idempotent.
    pub fn release(&mut self) {
        if let Some((page, pool)) = self.subscription.take() {
            pool.release(&page);
        }
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// One page's connection loop: connect, consume events until the stream
/// ends or errors, back off, reconnect. Runs until cancelled.
async fn run_reader(
    store: Arc<QueryStore>,
    http: reqwest::Client,
    url: String,
    page: PageId,
    initial_backoff: Duration,
    max_backoff: Duration,
    stop: CancellationToken,
) {
    let mut delay = initial_backoff;

    loop {
        let attempt = async {
            let response = match http.get(&url).send().await {
                Ok(response) if response.status().is_success() => response,
                Ok(response) => {
                    warn!(page = %page.0, status = %response.status(), "live connection rejected");
                    return false;
                }
                Err(e) => {
                    warn!(page = %page.0, error = %e, "live connection failed");
                    return false;
                }
            };

            trace!(page = %page.0, "live connection open");
            let mut events = response.bytes_stream().eventsource();
            let mut delivered = false;

            while let Some(item) = events.next().await {
                match item {
                    Ok(event) => {
                        delivered = true;
                        route_event(&store, &page, &event.event, &event.data);
                    }
                    Err(e) => {
                        warn!(page = %page.0, error = %e, "live stream error, reconnecting");
                        break;
                    }
                }
            }
            delivered
        };

        let delivered = tokio::select! {
            _ = stop.cancelled() => return,
            delivered = attempt => delivered,
        };

        // A connection that delivered events counts as healthy: start the
        // backoff ladder over.
        if delivered {
            delay = initial_backoff;
        }

        tokio::select! {
            _ = stop.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        delay = (delay * 2).min(max_backoff);
    }
}

/// Route one inbound event to cache invalidation. Parse failures are
/// logged and dropped; they must never propagate into the reader loop.
fn route_event(store: &QueryStore, page: &PageId, name: &str, data: &str) {
    match parse_event(name, data) {
        Ok(Some(LiveEvent::MessageInserted { conversation })) => {
            store.invalidate_messages(page, &conversation);
            store.invalidate_conversations(page);
        }
        Ok(Some(LiveEvent::Ready)) => trace!(page = %page.0, "live stream ready"),
        Ok(Some(LiveEvent::KeepAlive)) => trace!(page = %page.0, "live stream keepalive"),
        Ok(None) => debug!(page = %page.0, event = name, "skipping unknown live event"),
        Err(e) => warn!(page = %page.0, event = name, error = %e, "dropping malformed live event"),
    }
}
