// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A wiremock-backed stand-in for the backend API.
//!
//! Pre-wires the route shapes the sync layer talks to so individual tests
//! only state the interesting part (which rows, which status, which SSE
//! events).

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ventra_config::BackendConfig;

use crate::fixtures::{list_response, sse_body};

/// A mock backend server plus the config pointing clients at it.
pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Backend config aimed at this mock server.
    pub fn config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.server.uri(),
            group_prefix: "meta".into(),
            timeout_secs: 5,
        }
    }

    /// Serve a conversation's message list.
    pub async fn mount_messages(
        &self,
        page: &str,
        conversation: &str,
        rows: Vec<serde_json::Value>,
    ) {
        let total = rows.len() as u64;
        Mock::given(method("GET"))
            .and(path(format!("/meta/pages/{page}/{conversation}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_response(rows, total)))
            .mount(&self.server)
            .await;
    }

    /// Serve a page's conversation list.
    pub async fn mount_conversations(&self, page: &str, rows: Vec<serde_json::Value>) {
        let total = rows.len() as u64;
        Mock::given(method("GET"))
            .and(path(format!("/meta/pages/{page}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_response(rows, total)))
            .mount(&self.server)
            .await;
    }

    /// Accept sends into a conversation.
    pub async fn mount_send_ok(&self, page: &str, conversation: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/meta/pages/{page}/{conversation}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "data": null})),
            )
            .mount(&self.server)
            .await;
    }

    /// Reject sends into a conversation with the given status and message.
    pub async fn mount_send_error(&self, page: &str, conversation: &str, status: u16, msg: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/meta/pages/{page}/{conversation}")))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(serde_json::json!({"message": msg})),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve a page's SSE stream as a fixed body of (event, data) pairs.
    ///
    /// wiremock delivers the whole body and closes; the live reader will
    /// process every event and then schedule a reconnect, which lands on
    /// the same mock again. Event handling must therefore be idempotent in
    /// tests using this helper (invalidation is).
    pub async fn mount_sse(&self, page: &str, events: &[(&str, &str)]) {
        Mock::given(method("GET"))
            .and(path(format!("/meta/pages/{page}/sse")))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_raw(sse_body(events), "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }
}
