use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::{Claims, TokenError, TokenIssuer};

/// Authenticated user context extracted from the verified token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// JWT authentication middleware for protected routes.
///
/// No bearer credential ⇒ 401, credential that fails verification ⇒ 403.
/// Both responses carry no body and no challenge header. Ownership is left
/// to the handlers.
pub async fn jwt_auth_middleware(
    State(tokens): State<TokenIssuer>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(token) = extract_bearer(request.headers()) else {
        tracing::debug!("rejected {}: no bearer credential", request.uri().path());
        return Err(StatusCode::UNAUTHORIZED);
    };

    let claims = tokens.verify(token).map_err(|e| {
        match e {
            TokenError::Expired => tracing::debug!("rejected expired token"),
            other => tracing::warn!("rejected token: {}", other),
        }
        StatusCode::FORBIDDEN
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header, if one is present
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn missing_or_empty_credential_is_none() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("Bearer")), None);
        assert_eq!(extract_bearer(&headers("Bearer    ")), None);
    }

    #[test]
    fn other_schemes_are_not_bearer_credentials() {
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&headers("abc.def.ghi")), None);
    }
}
