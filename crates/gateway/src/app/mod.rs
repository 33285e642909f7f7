//! Gateway router wiring.
//!
//! - `routes/ledger.rs`: `/api/ledger/...` relayed to the ledger service
//! - `routes/users.rs`: `/api/users/...` relayed to the users service
//! - `routes/system.rs`: the gateway's own health endpoint

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use crate::client::{BackendClient, ReqwestBackend};
use crate::config::GatewayConfig;

pub mod routes;

/// Backend clients shared by every handler.
#[derive(Clone)]
pub struct Backends {
    pub ledger: Arc<dyn BackendClient>,
    pub users: Arc<dyn BackendClient>,
}

pub fn build_app(config: &GatewayConfig) -> anyhow::Result<Router> {
    let http = crate::client::http_client()?;

    Ok(build_router(Backends {
        ledger: Arc::new(ReqwestBackend::new(http.clone(), config.ledger_api_url.clone())),
        users: Arc::new(ReqwestBackend::new(http, config.users_api_url.clone())),
    }))
}

pub fn build_router(backends: Backends) -> Router {
    Router::new()
        .route("/api/health", get(routes::system::health))
        .nest("/api/ledger", routes::ledger::router())
        .nest("/api/users", routes::users::router())
        .layer(Extension(Arc::new(backends)))
}
