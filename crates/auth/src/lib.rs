//! `moneta-auth`: identity boundary for the ledger service.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns an
//! opaque bearer credential into a [`SecurityContext`] and a security context
//! into a validated [`moneta_core::OwnerId`].

pub mod claims;
pub mod context;
pub mod resolver;
pub mod verifier;

pub use claims::ClaimSet;
pub use context::SecurityContext;
pub use resolver::{DEFAULT_IDENTITY_CLAIM, IdentityError, IdentityResolver, parse_identity};
pub use verifier::{CredentialError, CredentialVerifier, Hs256Verifier};
