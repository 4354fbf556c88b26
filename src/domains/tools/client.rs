//! Authenticated HTTP client shared by the backing-service tools.
//!
//! One [`ApiClient`] is built per process from [`Config`](crate::core::Config)
//! and owned by the service's tool set. It knows how to authenticate, build
//! URLs from path segments and interpret HTTP status codes; the tool
//! definitions only deal with typed response bodies.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors raised while talking to a backing service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service rejected the credential (HTTP 401).
    #[error("{service} rejected the credential (HTTP 401). {hint}")]
    Unauthorized {
        service: &'static str,
        hint: &'static str,
    },

    /// Any other non-success status.
    #[error("{service} API returned {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("{service} API request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the JSON shape we expected.
    #[error("Failed to parse {service} API response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The credential cannot be sent as an HTTP header.
    #[error("Invalid {service} credential: {reason}")]
    InvalidCredential {
        service: &'static str,
        reason: String,
    },

    /// The configured base URL cannot be used.
    #[error("Invalid {service} API URL '{url}': {reason}")]
    InvalidUrl {
        service: &'static str,
        url: String,
        reason: String,
    },
}

/// How the credential is attached to each request.
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// A service-specific header carrying the raw credential.
    Header(&'static str, String),
}

/// HTTP client bound to one backing service.
#[derive(Clone)]
pub struct ApiClient {
    service: &'static str,
    credential_hint: &'static str,
    base_url: Url,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `service` rooted at `base_url`.
    ///
    /// `credential_hint` is appended to the 401 message so the operator knows
    /// which variable to fix and where to get a new credential.
    pub fn new(
        service: &'static str,
        base_url: &str,
        auth: Auth,
        credential_hint: &'static str,
    ) -> Result<Self, ApiError> {
        let invalid_url = |reason: String| ApiError::InvalidUrl {
            service,
            url: base_url.to_string(),
            reason,
        };

        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| invalid_url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid_url("URL cannot be a base".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let invalid_credential = |reason: String| ApiError::InvalidCredential { service, reason };
        let (name, value) = match auth {
            Auth::Bearer(token) => (AUTHORIZATION, format!("Bearer {token}")),
            Auth::Header(name, value) => (
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid_credential(e.to_string()))?,
                value,
            ),
        };
        let mut value = HeaderValue::from_str(&value).map_err(|e| invalid_credential(e.to_string()))?;
        value.set_sensitive(true);
        headers.insert(name, value);

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| ApiError::Request { service, source })?;

        Ok(Self {
            service,
            credential_hint,
            base_url,
            headers,
            http,
        })
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a segment containing `/`
    /// (a GitLab `group/project` id) stays a single segment.
    pub fn endpoint<I, S>(&self, segments: I) -> Result<Url, ApiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                service: self.service,
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue an authenticated GET and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T, ApiError> {
        self.get_page(url, query).await.map(|page| page.body)
    }

    /// Issue an authenticated GET and decode the JSON body, keeping the
    /// `x-next-page` pagination header GitLab sends on list endpoints.
    #[instrument(skip(self, url, query), fields(service = self.service, url = %url))]
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Page<T>, ApiError> {
        let service = self.service;

        let response = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Request { service, source })?;

        let status = response.status();
        log_rate_limit(service, response.headers());
        let next_page = next_page(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Request { service, source })?;

        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} rejected the configured credential", service);
            return Err(ApiError::Unauthorized {
                service,
                hint: self.credential_hint,
            });
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                service,
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        let body = serde_json::from_slice(&body).map_err(|source| ApiError::Decode { service, source })?;
        Ok(Page { body, next_page })
    }
}

/// One decoded page of a paginated listing.
#[derive(Debug)]
pub struct Page<T> {
    pub body: T,
    /// Value of `x-next-page`; `None` on the last page.
    pub next_page: Option<String>,
}

fn next_page(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-next-page")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Extract a readable message from an error body.
///
/// Prefers the JSON `message` (GitHub, GitLab) or `error` field, then the raw
/// text, then the status reason.
fn error_message(body: &[u8], status: StatusCode) -> String {
    if let Ok(json) = serde_json::from_slice::<Value>(body) {
        for key in ["message", "error"] {
            match json.get(key) {
                Some(Value::String(s)) => return s.clone(),
                Some(Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        text
    }
}

/// Warn when GitHub-style rate limit headers say the quota is nearly gone.
fn log_rate_limit(service: &str, headers: &HeaderMap) {
    let remaining = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if let Some(remaining) = remaining
        && remaining < 10
    {
        warn!(remaining, service, "API rate limit is low");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(
            "Example",
            base_url,
            Auth::Header("x-api-key", "secret".to_string()),
            "Set EXAMPLE_KEY.",
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client("https://api.example.com/v4/");
        let url = client.endpoint(["projects", "group/project", "merge_requests", "7"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v4/projects/group%2Fproject/merge_requests/7"
        );
    }

    #[test]
    fn test_endpoint_on_root_base() {
        let client = client("https://api.example.com");
        let url = client.endpoint(["repos", "octo", "hello", "contents"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/repos/octo/hello/contents");
    }

    #[test]
    fn test_endpoint_without_segments_keeps_base() {
        let client = client("https://api.example.com/res/v1/web/search");
        let url = client.endpoint(std::iter::empty::<&str>()).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/res/v1/web/search");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("Example", "not a url", Auth::Bearer("t".into()), "").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let client = ApiClient::new(
            "Example",
            "https://api.example.com",
            Auth::Header("X-Api-Key", "secret".into()),
            "",
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_unusable_header_name_is_invalid_credential() {
        let err = ApiClient::new(
            "Example",
            "https://api.example.com",
            Auth::Header("bad header", "secret".into()),
            "",
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredential { .. }));
    }

    #[tokio::test]
    async fn test_get_page_reads_next_page_header() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/items")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_header("x-next-page", "2")
            .with_body("[1]")
            .create_async()
            .await;
        server
            .mock("GET", "/items")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_header("x-next-page", "")
            .with_body("[2]")
            .create_async()
            .await;

        let client = client(&server.url());
        let url = client.endpoint(["items"]).unwrap();
        let first: Page<Vec<u32>> = client.get_page(url.clone(), &[("page", "1")]).await.unwrap();
        assert_eq!(first.body, vec![1]);
        assert_eq!(first.next_page.as_deref(), Some("2"));

        let last: Page<Vec<u32>> = client.get_page(url, &[("page", "2")]).await.unwrap();
        assert_eq!(last.body, vec![2]);
        assert_eq!(last.next_page, None);
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let body = br#"{"message":"Bad credentials","documentation_url":"x"}"#;
        assert_eq!(error_message(body, StatusCode::FORBIDDEN), "Bad credentials");
        assert_eq!(error_message(b"", StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(error_message(b"upstream down", StatusCode::BAD_GATEWAY), "upstream down");
    }

    #[tokio::test]
    async fn test_get_json_sends_credential() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/items")
            .match_header("x-api-key", "secret")
            .match_query(Matcher::UrlEncoded("q".into(), "rust lang".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let url = client.endpoint(["items"]).unwrap();
        let body: Value = client.get_json(url, &[("q", "rust lang")]).await.unwrap();

        assert_eq!(body, serde_json::json!({ "ok": true }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_json_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/items")
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let url = client.endpoint(["items"]).unwrap();
        let err = client.get_json::<Value>(url, &[]).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert!(err.to_string().contains("Set EXAMPLE_KEY."));
    }

    #[tokio::test]
    async fn test_get_json_status_error_keeps_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/items")
            .with_status(422)
            .with_body(r#"{"message":"Validation Failed"}"#)
            .create_async()
            .await;

        let client = client(&server.url());
        let url = client.endpoint(["items"]).unwrap();
        let err = client.get_json::<Value>(url, &[]).await.unwrap_err();

        assert_eq!(err.to_string(), "Example API returned 422: Validation Failed");
    }

    #[tokio::test]
    async fn test_get_json_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/items")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = client(&server.url());
        let url = client.endpoint(["items"]).unwrap();
        let err = client.get_json::<Value>(url, &[]).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
