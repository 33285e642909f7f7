//! Edge gateway: relays client calls to the ledger and users backends.

pub mod app;
pub mod client;
pub mod config;
pub mod forward;
