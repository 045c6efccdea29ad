//! In-memory transport for tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::HttpError;
use crate::request::{ApiRequest, Method};
use crate::transport::Transport;

#[derive(Debug, Default)]
struct Inner {
    responses: HashMap<(Method, String), Result<Value, (u16, Value)>>,
    requests: Vec<ApiRequest>,
}

/// Transport that records every request and replays canned responses.
///
/// Responses are keyed by method and path; unknown routes answer with a
/// `404 RESOURCE_NOT_FOUND`. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingTransport {
    /// Create a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `body`.
    #[must_use]
    pub fn with_response(self, method: Method, path: impl Into<String>, body: Value) -> Self {
        self.inner
            .lock()
            .responses
            .insert((method, path.into()), Ok(body));
        self
    }

    /// Answer `method path` with an API error.
    #[must_use]
    pub fn with_error(
        self,
        method: Method,
        path: impl Into<String>,
        status: u16,
        body: Value,
    ) -> Self {
        self.inner
            .lock()
            .responses
            .insert((method, path.into()), Err((status, body)));
        self
    }

    /// Every request sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().requests.clone()
    }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.inner.lock().requests.last().cloned()
    }

    /// Number of requests sent so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.inner.lock().requests.len()
    }
}

impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, HttpError> {
        let mut inner = self.inner.lock();
        let key = (request.method, request.path.clone());
        inner.requests.push(request);

        match inner.responses.get(&key) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err((status, body))) => {
                Err(HttpError::from_response(*status, body.to_string().as_bytes()))
            }
            None => Err(HttpError::Api {
                status: 404,
                error_code: Some("RESOURCE_NOT_FOUND".to_string()),
                detail: Some(format!("no route for {} {}", key.0, key.1)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_and_records() {
        let transport =
            RecordingTransport::new().with_response(Method::Get, "/a", json!({"ok": true}));

        let body = transport
            .execute(ApiRequest::get("/a"))
            .await
            .expect("route exists");
        assert_eq!(body, json!({"ok": true}));
        assert_eq!(transport.request_count(), 1);
        assert_eq!(
            transport.last_request().map(|r| r.path),
            Some("/a".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let transport = RecordingTransport::new();
        let err = transport
            .execute(ApiRequest::delete("/missing"))
            .await
            .expect_err("no route");
        assert_eq!(err.status(), Some(404));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn canned_error() {
        let transport = RecordingTransport::new().with_error(
            Method::Post,
            "/b",
            400,
            json!({"errorCode": "INVALID_ATTRIBUTE", "detail": "bad"}),
        );
        let err = transport
            .execute(ApiRequest::post("/b"))
            .await
            .expect_err("canned error");
        assert_eq!(err.error_code(), Some("INVALID_ATTRIBUTE"));
    }

    #[tokio::test]
    async fn clones_share_requests() {
        let transport = RecordingTransport::new();
        let clone = transport.clone();
        let _ = clone.execute(ApiRequest::get("/x")).await;
        assert_eq!(transport.request_count(), 1);
    }
}
