//! Identity resolution: security context → owner identity.
//!
//! Every ledger operation runs [`IdentityResolver::resolve`] before touching
//! the store. The resolver is pure validation and has no side effects.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use moneta_core::OwnerId;

use crate::{CredentialVerifier, SecurityContext};

/// Claim carrying the numeric user identity unless configured otherwise.
pub const DEFAULT_IDENTITY_CLAIM: &str = "id";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No security context, an anonymous one, or one without claims.
    #[error("authentication required")]
    Unauthenticated,

    /// The identity claim is missing from an otherwise valid credential.
    #[error("token does not carry an identity claim")]
    InvalidToken,

    /// The identity claim is not a non-negative integer.
    #[error("identity claim is malformed: {0}")]
    MalformedIdentity(String),
}

/// Resolves the caller's owner identity.
///
/// Built once at start-up with the credential verifier it fronts; the
/// verifier is stateless and shared by every request.
#[derive(Clone)]
pub struct IdentityResolver {
    verifier: Arc<dyn CredentialVerifier>,
    claim: String,
}

impl IdentityResolver {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            claim: DEFAULT_IDENTITY_CLAIM.to_string(),
        }
    }

    pub fn with_identity_claim(mut self, claim: impl Into<String>) -> Self {
        self.claim = claim.into();
        self
    }

    /// Turn an optional bearer token into a security context.
    ///
    /// Missing or rejected credentials produce an anonymous context rather
    /// than an error.
    pub fn authenticate(&self, bearer: Option<&str>) -> SecurityContext {
        let Some(token) = bearer else {
            return SecurityContext::anonymous();
        };

        match self.verifier.verify(token) {
            Ok(claims) => SecurityContext::authenticated(claims),
            Err(e) => {
                tracing::debug!(error = %e, "credential rejected; treating request as anonymous");
                SecurityContext::anonymous()
            }
        }
    }

    /// Validate the context and extract the owner identity.
    pub fn resolve(&self, ctx: Option<&SecurityContext>) -> Result<OwnerId, IdentityError> {
        let ctx = ctx.ok_or(IdentityError::Unauthenticated)?;
        if ctx.is_anonymous() {
            return Err(IdentityError::Unauthenticated);
        }
        let claims = ctx.claims().ok_or(IdentityError::Unauthenticated)?;
        let value = claims.get(&self.claim).ok_or(IdentityError::InvalidToken)?;
        parse_identity(value)
    }
}

/// Parse an identity claim value as a non-negative integer.
///
/// Accepts JSON integers and decimal strings; anything else is malformed.
pub fn parse_identity(value: &Value) -> Result<OwnerId, IdentityError> {
    let raw = match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| IdentityError::MalformedIdentity(n.to_string()))?,
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| IdentityError::MalformedIdentity(s.clone()))?,
        other => return Err(IdentityError::MalformedIdentity(other.to_string())),
    };

    OwnerId::new(raw).ok_or_else(|| IdentityError::MalformedIdentity(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClaimSet, CredentialError};
    use serde_json::json;

    struct FixedVerifier(Option<Value>);

    impl CredentialVerifier for FixedVerifier {
        fn verify(&self, _token: &str) -> Result<ClaimSet, CredentialError> {
            match &self.0 {
                Some(Value::Object(map)) => Ok(ClaimSet::new(map.clone())),
                _ => Err(CredentialError::Rejected("bad signature".into())),
            }
        }
    }

    fn resolver(claims: Option<Value>) -> IdentityResolver {
        IdentityResolver::new(Arc::new(FixedVerifier(claims)))
    }

    fn resolve_token(claims: Value) -> Result<OwnerId, IdentityError> {
        let r = resolver(Some(claims));
        let ctx = r.authenticate(Some("token"));
        r.resolve(Some(&ctx))
    }

    #[test]
    fn missing_context_is_unauthenticated() {
        assert_eq!(resolver(None).resolve(None), Err(IdentityError::Unauthenticated));
    }

    #[test]
    fn anonymous_context_is_unauthenticated() {
        let r = resolver(None);
        let ctx = r.authenticate(None);
        assert!(ctx.is_anonymous());
        assert_eq!(r.resolve(Some(&ctx)), Err(IdentityError::Unauthenticated));
    }

    #[test]
    fn rejected_credential_becomes_anonymous() {
        let r = resolver(None);
        let ctx = r.authenticate(Some("forged"));
        assert_eq!(r.resolve(Some(&ctx)), Err(IdentityError::Unauthenticated));
    }

    #[test]
    fn context_without_claims_is_unauthenticated() {
        let ctx = SecurityContext::without_claims();
        assert_eq!(resolver(None).resolve(Some(&ctx)), Err(IdentityError::Unauthenticated));
    }

    #[test]
    fn missing_identity_claim_is_invalid_token() {
        assert_eq!(resolve_token(json!({ "upn": "x" })), Err(IdentityError::InvalidToken));
        assert_eq!(resolve_token(json!({ "id": null })), Err(IdentityError::InvalidToken));
    }

    #[test]
    fn non_numeric_identity_is_malformed() {
        assert_eq!(
            resolve_token(json!({ "id": "abc" })),
            Err(IdentityError::MalformedIdentity("abc".into()))
        );
        assert!(matches!(resolve_token(json!({ "id": -3 })), Err(IdentityError::MalformedIdentity(_))));
        assert!(matches!(resolve_token(json!({ "id": 1.5 })), Err(IdentityError::MalformedIdentity(_))));
        assert!(matches!(resolve_token(json!({ "id": true })), Err(IdentityError::MalformedIdentity(_))));
    }

    #[test]
    fn numeric_and_string_identities_resolve() {
        assert_eq!(resolve_token(json!({ "id": 42 })).map(|o| o.get()), Ok(42));
        assert_eq!(resolve_token(json!({ "id": "42" })).map(|o| o.get()), Ok(42));
    }

    #[test]
    fn identity_claim_name_is_configurable() {
        let r = resolver(Some(json!({ "uid": 9 }))).with_identity_claim("uid");
        let ctx = r.authenticate(Some("token"));
        assert_eq!(r.resolve(Some(&ctx)).map(|o| o.get()), Ok(9));
    }
}
