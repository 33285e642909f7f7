//! Tracing/logging setup shared by the moneta binaries.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(service: &'static str) {
    tracing::init(service);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
