//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the ledger lifecycle operations (identity first, then store)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: query-parameter DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use moneta_auth::{Hs256Verifier, IdentityResolver};
use moneta_infra::{InMemoryLedgerStore, LedgerStore, PostgresLedgerStore};

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::LedgerService;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let mut verifier = Hs256Verifier::new(config.jwt_secret.as_bytes());
    if let Some(issuer) = &config.jwt_issuer {
        verifier = verifier.with_issuer(issuer);
    }
    let resolver = IdentityResolver::new(Arc::new(verifier)).with_identity_claim(config.identity_claim.clone());

    let store: Arc<dyn LedgerStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres ledger store");
            Arc::new(PostgresLedgerStore::connect(url, config.max_connections).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory ledger store");
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    Ok(build_router(Arc::new(LedgerService::new(store, resolver))))
}

/// Router over an already-built service.
pub fn build_router(service: Arc<LedgerService>) -> Router {
    let auth_state = middleware::AuthState {
        resolver: service.resolver().clone(),
    };

    // Every ledger route gets a security context; resolution happens per operation.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(service))
            .layer(axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
