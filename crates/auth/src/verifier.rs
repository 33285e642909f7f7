//! Credential verification boundary.
//!
//! Signature checks and expiry live behind [`CredentialVerifier`]; the rest of
//! the crate only ever sees the resulting [`ClaimSet`].

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::ClaimSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential has expired")]
    Expired,

    #[error("credential rejected: {0}")]
    Rejected(String),
}

/// Verifies an opaque bearer credential and yields its claims.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<ClaimSet, CredentialError>;
}

/// HS256 JWT verifier (shared secret).
#[derive(Clone)]
pub struct Hs256Verifier {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256Verifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Require tokens to carry this `iss` claim.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }
}

impl CredentialVerifier for Hs256Verifier {
    fn verify(&self, token: &str) -> Result<ClaimSet, CredentialError> {
        let data = jsonwebtoken::decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                _ => CredentialError::Rejected(e.to_string()),
            })?;
        Ok(ClaimSet::new(data.claims))
    }
}
