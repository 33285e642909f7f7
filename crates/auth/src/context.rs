use crate::ClaimSet;

/// Security context attached to a request by the credential boundary.
///
/// A request without a usable credential still gets a context, marked
/// anonymous; deciding that this is an error is the resolver's job.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityContext {
    anonymous: bool,
    claims: Option<ClaimSet>,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self {
            anonymous: true,
            claims: None,
        }
    }

    pub fn authenticated(claims: ClaimSet) -> Self {
        Self {
            anonymous: false,
            claims: Some(claims),
        }
    }

    /// Authenticated by the transport but without a claims object.
    pub fn without_claims() -> Self {
        Self {
            anonymous: false,
            claims: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn claims(&self) -> Option<&ClaimSet> {
        self.claims.as_ref()
    }
}
