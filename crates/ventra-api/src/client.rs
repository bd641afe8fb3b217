// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the backend REST API.
//!
//! Provides [`RestClient`] which handles request construction, cookie-based
//! authentication, response normalization, and the process-wide 401
//! re-authentication signal.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use ventra_config::BackendConfig;
use ventra_core::{Conversation, ConversationId, Message, Page, PageId, Paged, VentraError};

use crate::auth::AuthSignal;
use crate::wire::{
    ConversationDto, ListResponse, MessageDto, PageDto, decode_conversations, decode_messages,
    decode_pages,
};

/// Pagination parameters for the stored-pages listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PagesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// HTTP client for backend API communication.
///
/// Requests carry credentials via a cookie store (the console authenticates
/// through an external SSO provider whose session cookie the backend
/// expects). All non-2xx responses are normalized into [`VentraError`].
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthSignal,
}

impl RestClient {
    /// Creates a new backend API client from configuration.
    pub fn new(backend: &BackendConfig) -> Result<Self, VentraError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(backend.timeout_secs))
            .build()
            .map_err(|e| VentraError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: backend.api_base(),
            auth: AuthSignal::new(),
        })
    }

    /// Handle to the process-wide re-authentication signal raised on 401.
    pub fn auth_signal(&self) -> AuthSignal {
        self.auth.clone()
    }

    /// Fetch all messages of a conversation, decoded and normalized to
    /// ascending creation time.
    pub async fn conversation_messages(
        &self,
        page: &PageId,
        conversation: &ConversationId,
    ) -> Result<Paged<Message>, VentraError> {
        let url = format!("{}/pages/{}/{}", self.base_url, page.0, conversation.0);
        debug!(page = %page.0, conversation = %conversation.0, "fetching conversation messages");

        let response = self.get(&url).await?;
        let parsed: ListResponse<MessageDto> = read_json(response).await?;
        decode_messages(parsed)
    }

    /// Fetch the conversation summaries of a page. Order is backend-defined.
    pub async fn page_conversations(
        &self,
        page: &PageId,
    ) -> Result<Paged<Conversation>, VentraError> {
        let url = format!("{}/pages/{}", self.base_url, page.0);
        debug!(page = %page.0, "fetching page conversations");

        let response = self.get(&url).await?;
        let parsed: ListResponse<ConversationDto> = read_json(response).await?;
        Ok(decode_conversations(parsed))
    }

    /// Send a reply into a conversation. Only success/failure is reported;
    /// the authoritative message row arrives via the next cache refetch.
    pub async fn send_message(
        &self,
        page: &PageId,
        conversation: &ConversationId,
        text: &str,
    ) -> Result<(), VentraError> {
        let url = format!("{}/pages/{}/{}", self.base_url, page.0, conversation.0);
        debug!(page = %page.0, conversation = %conversation.0, "sending message");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "message": text }))
            .send()
            .await
            .map_err(transport)?;
        self.check(response).await?;
        Ok(())
    }

    /// List the pages stored for this console, with pagination.
    pub async fn stored_pages(&self, params: &PagesParams) -> Result<Paged<Page>, VentraError> {
        let url = format!("{}/pages", self.base_url);
        debug!(?params, "fetching stored pages");

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(transport)?;
        let response = self.check(response).await?;
        let parsed: ListResponse<PageDto> = read_json(response).await?;
        Ok(decode_pages(parsed))
    }

    /// Remove a page from the console.
    pub async fn delete_page(&self, page: &PageId) -> Result<(), VentraError> {
        let url = format!("{}/pages/{}", self.base_url, page.0);
        debug!(page = %page.0, "deleting page");

        let response = self.http.delete(&url).send().await.map_err(transport)?;
        self.check(response).await?;
        Ok(())
    }

    /// Ask the backend to pull this page's conversations from the platform
    /// into its own store.
    pub async fn sync_page_conversations(&self, page: &PageId) -> Result<(), VentraError> {
        let url = format!("{}/pages/{}/sync", self.base_url, page.0);
        debug!(page = %page.0, "syncing page conversations");

        let response = self.http.patch(&url).send().await.map_err(transport)?;
        self.check(response).await?;
        Ok(())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, VentraError> {
        let response = self.http.get(url).send().await.map_err(transport)?;
        self.check(response).await
    }

    /// Normalize a response: pass 2xx through, raise the re-auth signal on
    /// 401, and turn everything else into an API error with a best-effort
    /// message from the body.
    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, VentraError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("backend returned 401, raising re-authentication signal");
            self.auth.raise();
            return Err(VentraError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        Err(VentraError::Api {
            status: status.as_u16(),
            message: extract_error_message(status, &body),
        })
    }
}

fn transport(e: reqwest::Error) -> VentraError {
    VentraError::Transport {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, VentraError> {
    let body = response.text().await.map_err(|e| VentraError::Transport {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| VentraError::Decode(format!("response body: {e}")))
}

/// Best-effort extraction of a human-readable message from an error body.
/// Falls back through `message`, `error.message`, the raw body, and the
/// status reason phrase.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value.pointer("/error/message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> RestClient {
        RestClient::new(&BackendConfig {
            base_url: server.uri(),
            group_prefix: "meta".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn message_row(id: &str, created: &str, sender_id: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "conversation_id": "c1",
            "created_time": created,
            "message": text,
            "from": format!("{{\"id\":\"{sender_id}\",\"name\":\"Someone\"}}"),
            "attachments": null
        })
    }

    #[tokio::test]
    async fn conversation_messages_decode_and_sort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meta/pages/p1/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [
                    message_row("m2", "2026-08-01T10:00:00Z", "u1", "second"),
                    message_row("m1", "2026-08-01T09:00:00Z", "p1", "first"),
                ],
                "meta": { "total": 2, "page": 1, "limit": 50 }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let paged = client
            .conversation_messages(&PageId("p1".into()), &ConversationId("c1".into()))
            .await
            .unwrap();

        assert_eq!(paged.total, 2);
        assert_eq!(paged.items[0].id.0, "m1");
        assert_eq!(paged.items[0].sender.id, "p1");
        assert_eq!(paged.items[1].text, "second");
    }

    #[tokio::test]
    async fn unauthorized_raises_reauth_signal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meta/pages/p1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let signal = client.auth_signal();
        assert_eq!(signal.raised(), 0);

        let result = client.page_conversations(&PageId("p1".into())).await;
        assert!(matches!(result, Err(VentraError::Unauthorized)));
        assert_eq!(signal.raised(), 1);
    }

    #[tokio::test]
    async fn api_error_extracts_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/meta/pages/p1/c1"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"message": "message too long"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .send_message(&PageId("p1".into()), &ConversationId("c1".into()), "hi")
            .await
            .unwrap_err();

        match err {
            VentraError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "message too long");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn api_error_falls_back_to_nested_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/meta/pages/p1/sync"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "success": false,
                "error": { "message": "page has no token", "status": 422 }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .sync_page_conversations(&PageId("p1".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("page has no token"), "got: {err}");
    }

    #[tokio::test]
    async fn send_message_posts_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/meta/pages/p1/c1"))
            .and(body_json(serde_json::json!({"message": "xin chào"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "data": null})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .send_message(
                &PageId("p1".into()),
                &ConversationId("c1".into()),
                "xin chào",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stored_pages_sends_pagination_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/meta/pages"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [
                    { "id": 7, "page_id": "p7", "name": "Shop 7", "access_token": "t", "category": "Retail" }
                ],
                "meta": { "total": 21, "page": 2, "limit": 10 }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let paged = client
            .stored_pages(&PagesParams {
                page: Some(2),
                limit: Some(10),
            })
            .await
            .unwrap();

        assert_eq!(paged.total, 21);
        assert_eq!(paged.items[0].id.0, "p7");
        assert_eq!(paged.items[0].category, "Retail");
    }
}
