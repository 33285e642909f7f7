use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use moneta_auth::IdentityResolver;

#[derive(Clone)]
pub struct AuthState {
    pub resolver: IdentityResolver,
}

/// Attach a `SecurityContext` to every request.
///
/// Never rejects: a missing or invalid credential yields an anonymous
/// context, and handlers decide through the resolver.
pub async fn auth_middleware(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let ctx = state.resolver.authenticate(extract_bearer(req.headers()));
    req.extensions_mut().insert(ctx);

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let (scheme, token) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();

    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_bearer(&headers("bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&headers("BEARER abc.def")), Some("abc.def"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(extract_bearer(&headers("Basic Zm9vOmJhcg==")), None);
        assert_eq!(extract_bearer(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer(&headers("Bearer")), None);
        assert_eq!(extract_bearer(&headers("Bearerabc")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
