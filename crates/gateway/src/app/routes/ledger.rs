use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, OriginalUri},
    http::{HeaderMap, Method, header::AUTHORIZATION},
    response::Response,
    routing::{get, post},
};

use crate::app::Backends;
use crate::client::BackendCall;
use crate::forward::forward;

/// Mirrors the ledger service's routes one to one.
pub fn router() -> Router {
    Router::new()
        .route("/entry", post(relay).patch(relay).delete(relay))
        .route("/entries", get(relay))
        .route("/by-tag", get(relay))
        .route("/balance", get(relay))
        .route("/whoami", get(relay))
}

/// `/api/ledger/x?q` becomes `/ledger/x?q` on the ledger service.
pub async fn relay(
    Extension(backends): Extension<Arc<Backends>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().strip_prefix("/api").unwrap_or(uri.path());
    let call = BackendCall::new(method, path)
        .with_query(uri.query())
        .with_headers_from(&headers, &[AUTHORIZATION.as_str()]);

    forward(backends.ledger.as_ref(), call).await
}
