/// Bearer token issuance and verification
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256) using a single shared
/// secret that the server loads once at startup. They assert "this request
/// acts on behalf of user X until time T" without any server-side session.
///
/// # Security
///
/// - **Algorithm**: HS256 only. The `alg` header of an incoming token is never
///   used to pick the verification algorithm; anything other than HS256 is
///   rejected.
/// - **Expiration**: Fixed at [`ACCESS_TOKEN_TTL_MINUTES`] minutes, zero leeway
/// - **Revocation**: None. A token stays valid until it expires.
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::{issue_access_token, verify_access_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// let token = issue_access_token(42, secret)?;
/// assert_eq!(verify_access_token(&token, secret)?, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an access token
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 30;

/// The only algorithm tokens are signed and verified with
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format, algorithm or required claims are wrong
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// The `sub` claim is not a numeric user id
    #[error("Invalid token subject: {0}")]
    InvalidSubject(String),
}

/// JWT claims structure
///
/// - `sub`: Subject, the user id rendered as a decimal string
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID as a string
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `user_id` with the standard access token lifetime
    pub fn new(user_id: i64) -> Self {
        Self::with_expiration(user_id, Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration yields claims that are already expired.
    pub fn with_expiration(user_id: i64, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }
}

/// Signs `claims` into a token string
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(ALGORITHM);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies:
/// - The header declares HS256
/// - Signature is valid for `secret`
/// - `exp` and `sub` are present
/// - Token hasn't expired (no leeway)
///
/// # Errors
///
/// Returns `JwtError::Expired` for an expired but otherwise valid token, and
/// `JwtError::ValidationError` for everything else.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(ALGORITHM);
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues an access token for `user_id`, valid for 30 minutes
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::issue_access_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = issue_access_token(7, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(token.split('.').count(), 3);
/// # Ok(())
/// # }
/// ```
pub fn issue_access_token(user_id: i64, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::new(user_id), secret)
}

/// Verifies an access token and returns the user id it was issued for
///
/// # Errors
///
/// Any failure from [`validate_token`], or `JwtError::InvalidSubject` when
/// the subject is not a numeric id.
pub fn verify_access_token(token: &str, secret: &str) -> Result<i64, JwtError> {
    validate_token(token, secret)?.user_id()
}
