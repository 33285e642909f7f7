use std::sync::Arc;

use axum::{
    Router,
    extract::Extension,
    http::{HeaderMap, Method},
    response::Response,
    routing::{patch, post},
};

use crate::app::Backends;
use crate::client::BackendCall;
use crate::forward::forward;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/create", post(create))
        .route("/update", patch(update))
        .route("/updateUser", patch(update))
        .route("/delete", post(delete))
}

pub async fn login(Extension(backends): Extension<Arc<Backends>>, headers: HeaderMap) -> Response {
    relay(&backends, Method::POST, "/users/login", &headers, &["email", "password"]).await
}

pub async fn create(Extension(backends): Extension<Arc<Backends>>, headers: HeaderMap) -> Response {
    relay(&backends, Method::POST, "/users/create", &headers, &["name", "email", "password"]).await
}

pub async fn update(Extension(backends): Extension<Arc<Backends>>, headers: HeaderMap) -> Response {
    relay(
        &backends,
        Method::PATCH,
        "/users/updateUser",
        &headers,
        &["authorization", "name", "email", "password"],
    )
    .await
}

pub async fn delete(Extension(backends): Extension<Arc<Backends>>, headers: HeaderMap) -> Response {
    relay(&backends, Method::POST, "/users/delete", &headers, &["authorization"]).await
}

async fn relay(backends: &Backends, method: Method, path: &str, headers: &HeaderMap, names: &[&str]) -> Response {
    let call = BackendCall::new(method, path).with_headers_from(headers, names);
    forward(backends.users.as_ref(), call).await
}
