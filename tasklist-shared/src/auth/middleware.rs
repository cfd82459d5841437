/// Request authentication helpers for Axum
///
/// Extracts the bearer token from the `Authorization` header, verifies it and
/// produces the [`AuthUser`] that handlers read from request extensions.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use tasklist_shared::auth::middleware::AuthUser;
///
/// async fn handler(Extension(auth): Extension<AuthUser>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{verify_access_token, JwtError};

/// Authenticated caller, added to request extensions after token verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID taken from the token subject
    pub user_id: i64,
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No usable Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("{0}")]
    InvalidFormat(String),

    /// Token verification failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat(
            "Invalid authentication scheme".to_string(),
        ));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Resolves the caller of a request from its headers
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers)?;

    let user_id = verify_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidSubject(_) => AuthError::InvalidToken("Invalid token payload".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthUser { user_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::issue_access_token;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(&headers_with("bearer abc")).unwrap(), "abc");

        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer    ")),
            Err(AuthError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_authenticate_valid_token() {
        let token = issue_access_token(7, SECRET).unwrap();
        let auth = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();

        assert_eq!(auth, AuthUser { user_id: 7 });
    }

    #[test]
    fn test_authenticate_rejects_foreign_token() {
        let token = issue_access_token(7, "some-other-secret-that-is-long-enough").unwrap();
        let result = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
