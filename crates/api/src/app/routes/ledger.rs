use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use moneta_auth::SecurityContext;
use moneta_ledger::{EntryInput, FilterSpec};

use crate::app::dto;
use crate::app::errors;
use crate::app::routes::system;
use crate::app::services::LedgerService;

pub fn router() -> Router {
    Router::new()
        .route("/entry", post(create_entry).patch(update_entry).delete(delete_entry))
        .route("/entries", get(list_entries))
        .route("/by-tag", get(tag_totals))
        .route("/balance", get(balance))
        .route("/whoami", get(system::whoami))
}

type Ctx = Option<Extension<SecurityContext>>;

pub async fn create_entry(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Ctx,
    input: Result<Query<EntryInput>, QueryRejection>,
) -> axum::response::Response {
    let Query(input) = match input {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    match service.create(ctx.as_deref(), input).await {
        Ok(entry) => (StatusCode::CREATED, Json(dto::entry_to_json(entry))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_entries(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Ctx,
    filter: Result<Query<FilterSpec>, QueryRejection>,
) -> axum::response::Response {
    let Query(filter) = match filter {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    match service.list(ctx.as_deref(), &filter).await {
        Ok(entries) => {
            let items = entries.into_iter().map(dto::entry_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_entry(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Ctx,
    query: Result<Query<dto::UpdateEntryQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    let (id, input) = query.split();
    match service.update(ctx.as_deref(), id.as_deref(), input).await {
        Ok(entry) => (StatusCode::OK, Json(dto::entry_to_json(entry))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_entry(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Ctx,
    query: Result<Query<dto::EntryIdQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    match service.delete(ctx.as_deref(), query.id.as_deref()).await {
        Ok(entry) => (StatusCode::OK, Json(dto::entry_to_json(entry))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn tag_totals(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Ctx,
    filter: Result<Query<FilterSpec>, QueryRejection>,
) -> axum::response::Response {
    let Query(filter) = match filter {
        Ok(q) => q,
        Err(rejection) => return errors::query_rejection_to_response(rejection),
    };
    match service.tag_totals(ctx.as_deref(), &filter).await {
        Ok(totals) => {
            let items = totals.into_iter().map(dto::tag_total_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn balance(
    Extension(service): Extension<Arc<LedgerService>>,
    ctx: Ctx,
) -> axum::response::Response {
    match service.balance(ctx.as_deref()).await {
        Ok(balance) => (StatusCode::OK, Json(dto::balance_to_json(balance))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
