//! `AuthUser` extractor: pulls the bearer token, verifies it, and injects
//! the request context.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use tokengate_auth::RequestContext;
use tokengate_auth::error::UNAUTHORIZED_MESSAGE;
use tokengate_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the bearer token.
pub const TOKEN_HEADER: &str = "token";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Reads the bearer from the `token` header, falling back to
/// `Authorization: Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let from_token = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty());

    from_token.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(strip_bearer_scheme)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

/// Strips a case-insensitive `Bearer ` scheme prefix.
fn strip_bearer_scheme(value: &str) -> Option<&str> {
    const SCHEME: &str = "Bearer ";
    let prefix = value.get(..SCHEME.len())?;
    prefix
        .eq_ignore_ascii_case(SCHEME)
        .then(|| &value[SCHEME.len()..])
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            warn!(path = %parts.uri.path(), "Missing bearer token");
            return Err(AppError::authentication(UNAUTHORIZED_MESSAGE).into());
        };

        let claims = state.jwt_decoder.verify(token).map_err(|e| {
            warn!(path = %parts.uri.path(), code = e.code(), "Token verification failed");
            ApiError::from(e)
        })?;

        Ok(AuthUser(RequestContext::from(claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_header_preferred() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn test_authorization_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer lower"));
        assert_eq!(bearer_token(&headers), Some("lower"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("BEARER upper"));
        assert_eq!(bearer_token(&headers), Some("upper"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("  "));
        assert_eq!(bearer_token(&headers), None);
    }
}
