use axum::Router;

pub mod ledger;
pub mod system;

/// Router for every endpoint that receives a security context.
pub fn router() -> Router {
    Router::new().nest("/ledger", ledger::router())
}
