// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-through and advisory-cancellation behavior against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use ventra_api::RestClient;
use ventra_core::{ConversationId, PageId};
use ventra_store::QueryStore;
use ventra_test_utils::{MockBackend, list_response, message, message_row, paged};

fn store_for(backend: &MockBackend) -> Arc<QueryStore> {
    let api = Arc::new(RestClient::new(&backend.config()).unwrap());
    Arc::new(QueryStore::new(api))
}

#[tokio::test]
async fn fresh_entries_are_served_from_cache() {
    let backend = MockBackend::start().await;
    let now = Utc::now();

    Mock::given(method("GET"))
        .and(path("/meta/pages/p1/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(
            vec![message_row("m1", "c1", "customer", "hello", now)],
            1,
        )))
        .expect(1)
        .mount(&backend.server)
        .await;

    let store = store_for(&backend);
    let page = PageId("p1".into());
    let conv = ConversationId("c1".into());

    let first = store.messages(&page, &conv).await.unwrap();
    let second = store.messages(&page, &conv).await.unwrap();

    assert_eq!(first, second);
    assert!(store.messages_fresh(&page, &conv));
    // The expect(1) on the mock verifies the second read never hit the network.
}

#[tokio::test]
async fn invalidation_forces_a_refetch() {
    let backend = MockBackend::start().await;
    let now = Utc::now();

    Mock::given(method("GET"))
        .and(path("/meta/pages/p1/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(
            vec![message_row("m1", "c1", "customer", "hello", now)],
            1,
        )))
        .expect(2)
        .mount(&backend.server)
        .await;

    let store = store_for(&backend);
    let page = PageId("p1".into());
    let conv = ConversationId("c1".into());

    store.messages(&page, &conv).await.unwrap();
    store.invalidate_messages(&page, &conv);
    assert!(!store.messages_fresh(&page, &conv));

    store.messages(&page, &conv).await.unwrap();
    assert!(store.messages_fresh(&page, &conv));
}

#[tokio::test]
async fn cancelled_fetch_does_not_clobber_a_later_patch() {
    let backend = MockBackend::start().await;
    let now = Utc::now();

    // The backend answers slowly, with pre-send data.
    Mock::given(method("GET"))
        .and(path("/meta/pages/p1/c1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(list_response(
                    vec![
                        message_row("m1", "c1", "customer", "one", now),
                        message_row("m2", "c1", "customer", "two", now),
                    ],
                    2,
                )),
        )
        .mount(&backend.server)
        .await;

    let store = store_for(&backend);
    let page = PageId("p1".into());
    let conv = ConversationId("c1".into());

    // Seed and mark stale so the next read goes to the (slow) network.
    store.write_messages(
        &page,
        &conv,
        paged(vec![
            message("m1", "c1", "customer", "one", now),
            message("m2", "c1", "customer", "two", now),
        ]),
    );
    store.invalidate_messages(&page, &conv);

    let fetching = {
        let store = Arc::clone(&store);
        let page = page.clone();
        let conv = conv.clone();
        tokio::spawn(async move { store.messages(&page, &conv).await })
    };

    // While the fetch is in flight: cancel it, then patch optimistically.
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.cancel_messages_fetch(&page, &conv);
    store.patch_messages(&page, &conv, |cached| {
        let mut provisional = message("temp-1", "c1", "p1", "three", Utc::now());
        provisional.optimistic = true;
        cached.items.push(provisional);
        cached.total += 1;
    });

    // The fetch completes and returns its own (stale) view to the caller,
    // but its write into the cache is dropped.
    let fetched = fetching.await.unwrap().unwrap();
    assert_eq!(fetched.items.len(), 2);

    let cached = store.read_messages(&page, &conv).unwrap();
    assert_eq!(cached.items.len(), 3);
    assert!(cached.items.iter().any(|m| m.optimistic));
}

#[tokio::test]
async fn page_mutations_invalidate_the_entries_that_view_them() {
    let backend = MockBackend::start().await;

    Mock::given(method("GET"))
        .and(path("/meta/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(
            vec![serde_json::json!({
                "id": 1, "page_id": "p1", "name": "Shop", "access_token": "t", "category": "Retail"
            })],
            1,
        )))
        .mount(&backend.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/meta/pages/p1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true, "data": null})),
        )
        .mount(&backend.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/meta/pages/p1/sync"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"success": true, "data": null})),
        )
        .mount(&backend.server)
        .await;

    let store = store_for(&backend);
    let page = PageId("p1".into());

    store.pages().await.unwrap();
    assert!(store.pages_fresh());
    store.write_conversations(&page, paged(vec![]));

    store.sync_page_conversations(&page).await.unwrap();
    assert!(!store.conversations_fresh(&page));
    assert!(store.pages_fresh(), "conversation sync must not touch pages");

    store.delete_page(&page).await.unwrap();
    assert!(!store.pages_fresh());
}
