use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use moneta_auth::SecurityContext;

use crate::app::errors;
use crate::app::services::LedgerService;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Echo the resolved caller identity with the informational claims.
pub async fn whoami(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Option<Extension<SecurityContext>>,
) -> axum::response::Response {
    let ctx = ctx.as_deref();
    let owner = match service.resolver().resolve(ctx) {
        Ok(owner) => owner,
        Err(e) => return errors::service_error_to_response(e.into()),
    };
    let claims = ctx.and_then(SecurityContext::claims);

    Json(serde_json::json!({
        "user_id": owner.get(),
        "upn": claims.and_then(|c| c.upn()),
        "groups": claims.map(|c| c.groups()).unwrap_or_default(),
        "authenticated": true,
    }))
    .into_response()
}
