use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use moneta_auth::IdentityError;
use moneta_core::DomainError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Identity(e) => match e {
            IdentityError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", e.to_string()),
            IdentityError::InvalidToken => json_error(StatusCode::UNAUTHORIZED, "invalid_token", e.to_string()),
            IdentityError::MalformedIdentity(_) => {
                json_error(StatusCode::BAD_REQUEST, "malformed_identity", e.to_string())
            }
        },
        ServiceError::Domain(e) => match e {
            DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
            DomainError::InvalidFilter(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_filter", msg),
            DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "entry not found"),
        },
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "ledger store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal error")
        }
    }
}

/// Unparseable query strings get the same JSON shape as every other error.
pub fn query_rejection_to_response(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
