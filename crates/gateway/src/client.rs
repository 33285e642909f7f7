//! Remote-call boundary towards the backend services.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header::CONTENT_TYPE};
use thiserror::Error;

/// One outbound call, already stripped to what the backend should see.
#[derive(Debug, Clone)]
pub struct BackendCall {
    pub method: Method,
    /// Absolute path on the backend, e.g. `/ledger/entries`.
    pub path: String,
    /// Raw query string, forwarded byte for byte.
    pub query: Option<String>,
    pub headers: HeaderMap,
}

impl BackendCall {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.filter(|q| !q.is_empty()).map(str::to_string);
        self
    }

    /// Copy the named headers from `source`, skipping the ones that are absent.
    pub fn with_headers_from(mut self, source: &HeaderMap, names: &[&str]) -> Self {
        for name in names {
            let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
                continue;
            };
            for value in source.get_all(&name) {
                self.headers.append(name.clone(), value.clone());
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Vec<u8>,
}

impl BackendResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = Some(HeaderValue::from_static(content_type));
        self
    }
}

#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// The backend answered with a non-success status.
    #[error("backend responded {}", .0.status)]
    Response(BackendResponse),

    /// No response at all (connect error, timeout, broken stream).
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    async fn call(&self, call: BackendCall) -> Result<BackendResponse, UpstreamFailure>;
}

/// HTTP client for backend calls.
///
/// Redirects are not followed: a backend 3xx is itself the answer to relay.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// `reqwest`-backed client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestBackend {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, call: &BackendCall) -> String {
        match &call.query {
            Some(query) => format!("{}{}?{}", self.base_url, call.path, query),
            None => format!("{}{}", self.base_url, call.path),
        }
    }
}

#[async_trait::async_trait]
impl BackendClient for ReqwestBackend {
    async fn call(&self, call: BackendCall) -> Result<BackendResponse, UpstreamFailure> {
        let url = self.url(&call);
        let resp = self
            .http
            .request(call.method, url)
            .headers(call.headers)
            .send()
            .await
            .map_err(|e| UpstreamFailure::Unavailable(e.to_string()))?;

        let status = resp.status();
        let content_type = resp.headers().get(CONTENT_TYPE).cloned();

        if status.is_success() {
            let body = resp
                .bytes()
                .await
                .map_err(|e| UpstreamFailure::Unavailable(e.to_string()))?;
            return Ok(BackendResponse {
                status,
                content_type,
                body: body.to_vec(),
            });
        }

        // The status is already known; an unreadable body relays as empty.
        let body = resp.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        Err(UpstreamFailure::Response(BackendResponse {
            status,
            content_type,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    #[test]
    fn url_keeps_the_raw_query() {
        let backend = ReqwestBackend::new(reqwest::Client::new(), "http://ledger:8080");
        let call = BackendCall::new(Method::GET, "/ledger/entries").with_query(Some("tag=caf%C3%A9&direction=D"));
        assert_eq!(backend.url(&call), "http://ledger:8080/ledger/entries?tag=caf%C3%A9&direction=D");

        let call = BackendCall::new(Method::GET, "/ledger/balance").with_query(Some(""));
        assert_eq!(backend.url(&call), "http://ledger:8080/ledger/balance");
    }

    #[test]
    fn only_named_headers_are_copied() {
        let mut inbound = HeaderMap::new();
        inbound.insert(AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        inbound.insert("cookie", HeaderValue::from_static("session=1"));
        inbound.insert("email", HeaderValue::from_static("ana@example.com"));

        let call = BackendCall::new(Method::POST, "/users/login").with_headers_from(&inbound, &["email", "password"]);
        assert_eq!(call.headers.len(), 1);
        assert_eq!(call.headers["email"], "ana@example.com");
    }
}
