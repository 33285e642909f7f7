//! Turning a backend outcome into the client-facing response.

use axum::{
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::client::{BackendCall, BackendClient, BackendResponse, UpstreamFailure};

/// Perform `call` and hand the backend's answer to the client unchanged.
///
/// Backend failures keep their status and body; only a call that produced no
/// response at all becomes a bare `500`.
pub async fn forward(backend: &dyn BackendClient, call: BackendCall) -> Response {
    let method = call.method.clone();
    let path = call.path.clone();

    match backend.call(call).await {
        Ok(resp) => relay(resp),
        Err(UpstreamFailure::Response(resp)) => {
            tracing::warn!(%method, %path, status = resp.status.as_u16(), "backend returned failure");
            relay(resp)
        }
        Err(UpstreamFailure::Unavailable(reason)) => {
            tracing::error!(%method, %path, %reason, "backend unavailable");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn relay(resp: BackendResponse) -> Response {
    let mut out = (resp.status, resp.body).into_response();
    match resp.content_type {
        Some(ct) => {
            out.headers_mut().insert(CONTENT_TYPE, ct);
        }
        None => {
            out.headers_mut().remove(CONTENT_TYPE);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    struct Fixed(fn() -> Result<BackendResponse, UpstreamFailure>);

    #[async_trait::async_trait]
    impl BackendClient for Fixed {
        async fn call(&self, _call: BackendCall) -> Result<BackendResponse, UpstreamFailure> {
            (self.0)()
        }
    }

    async fn body_of(resp: Response) -> Vec<u8> {
        axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    fn call() -> BackendCall {
        BackendCall::new(Method::DELETE, "/ledger/entry")
    }

    #[tokio::test]
    async fn success_is_relayed_with_its_content_type() {
        let backend = Fixed(|| {
            Ok(BackendResponse::new(StatusCode::CREATED, br#"{"id":1}"#.to_vec()).with_content_type("application/json"))
        });

        let resp = forward(&backend, call()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_of(resp).await, br#"{"id":1}"#);
    }

    #[tokio::test]
    async fn backend_failure_keeps_status_and_body() {
        let backend = Fixed(|| Err(UpstreamFailure::Response(BackendResponse::new(StatusCode::NOT_FOUND, "not found"))));

        let resp = forward(&backend, call()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(body_of(resp).await, b"not found");
    }

    #[tokio::test]
    async fn non_text_failure_body_is_relayed_raw() {
        let backend = Fixed(|| {
            Err(UpstreamFailure::Response(BackendResponse::new(
                StatusCode::BAD_REQUEST,
                vec![0xff, 0xfe, 0x00],
            )))
        });

        let resp = forward(&backend, call()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(resp).await, vec![0xff, 0xfe, 0x00]);
    }

    #[tokio::test]
    async fn missing_response_is_internal_error() {
        let backend = Fixed(|| Err(UpstreamFailure::Unavailable("connection refused".into())));

        let resp = forward(&backend, call()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_of(resp).await.is_empty());
    }
}
