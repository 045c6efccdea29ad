//! Transports that turn an [`ApiRequest`] into a JSON response.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue, WWW_AUTHENTICATE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{trace, warn};
use url::Url;

use crate::digest::{self, Challenge, Credentials};
use crate::error::HttpError;
use crate::request::ApiRequest;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends requests to one backend API.
///
/// Backend clients are generic over this trait so the same client code runs
/// against a real server or an in-memory fake.
pub trait Transport: Send + Sync {
    /// Send one request and return the decoded JSON body (`null` when empty).
    fn execute(&self, request: ApiRequest)
    -> impl Future<Output = Result<Value, HttpError>> + Send;
}

/// reqwest-backed transport with digest authentication.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Build a transport for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self, HttpError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| HttpError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HttpError::InvalidUrl(format!(
                "{base_url}: must start with http:// or https://"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("dbplane/", env!("CARGO_PKG_VERSION")))
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Base URL every request path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve the request path and query into a full URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be joined onto the base URL.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, HttpError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {e}", request.path)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    fn build(&self, request: &ApiRequest, url: &Url) -> RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.into(), url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body.to_string());
        }
        builder
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        let url = self.url_for(&request)?;
        trace!(method = %request.method, url = %url, "sending request");

        let response = self.build(&request, &url).send().await?;
        let response = if response.status() == StatusCode::UNAUTHORIZED {
            self.replay_with_digest(&request, &url, response).await?
        } else {
            response
        };

        let status = response.status();
        let body = response.bytes().await?;
        trace!(status = status.as_u16(), bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(HttpError::from_response(status.as_u16(), &body));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// Answer a digest challenge once; any further `401` is returned as is.
    async fn replay_with_digest(
        &self,
        request: &ApiRequest,
        url: &Url,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, HttpError> {
        let Some(header) = response.headers().get(WWW_AUTHENTICATE) else {
            return Ok(response);
        };
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(HttpError::MissingCredentials)?;
        let header = header
            .to_str()
            .map_err(|e| HttpError::InvalidChallenge(e.to_string()))?;
        let challenge = Challenge::parse(header)?;

        let uri = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };
        let authorization = challenge.authorization(
            credentials,
            request.method.as_str(),
            &uri,
            &digest::cnonce(),
            1,
        );
        let authorization = HeaderValue::from_str(&authorization)
            .map_err(|e| HttpError::InvalidChallenge(e.to_string()))?;

        let replay = self
            .build(request, url)
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "digest authentication rejected");
        }
        Ok(replay)
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, HttpError> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ListOptions;

    #[test]
    fn rejects_invalid_url() {
        let result = HttpTransport::new("not a url", None);
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let result = HttpTransport::new("ws://localhost:8080", None);
        assert!(result.expect_err("rejected").to_string().contains("http://"));
    }

    #[test]
    fn appends_trailing_slash() {
        let transport =
            HttpTransport::new("https://opsmanager.example.com:8443/mms", None).expect("valid");
        assert_eq!(
            transport.base_url().as_str(),
            "https://opsmanager.example.com:8443/mms/"
        );
    }

    #[test]
    fn url_for_joins_path_and_query() {
        let transport = HttpTransport::new("https://cloud.example.com", None).expect("valid");
        let request = ApiRequest::get("/api/atlas/v1.0/groups/p1/clusters")
            .with_list_options(Some(&ListOptions::page(2, 100)));

        let url = transport.url_for(&request).expect("joinable");
        assert_eq!(
            url.as_str(),
            "https://cloud.example.com/api/atlas/v1.0/groups/p1/clusters?pageNum=2&itemsPerPage=100"
        );
    }

    #[test]
    fn url_for_keeps_base_path_prefix() {
        let transport = HttpTransport::new("https://om.internal/prefix/", None).expect("valid");
        let url = transport
            .url_for(&ApiRequest::get("/api/public/v1.0/groups"))
            .expect("joinable");
        assert_eq!(url.as_str(), "https://om.internal/prefix/api/public/v1.0/groups");
    }

    #[test]
    fn debug_hides_private_key() {
        let transport = HttpTransport::new(
            "https://cloud.example.com",
            Some(Credentials::new("pub", "priv-secret")),
        )
        .expect("valid");
        let debug = format!("{transport:?}");
        assert!(debug.contains("pub"));
        assert!(!debug.contains("priv-secret"));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:9", None).expect("valid");
        let result = transport.execute(ApiRequest::get("/api/atlas/v1.0")).await;
        assert!(matches!(result, Err(HttpError::Transport(_))));
    }
}
