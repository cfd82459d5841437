/// Authentication utilities
///
/// This module provides the authentication primitives for Tasklist:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issuance and verification
/// - [`middleware`]: Bearer header parsing and the authenticated user context
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations, input capped at 72 bytes
/// - **Tokens**: HS256 only, 30 minute lifetime, no refresh
/// - **Constant-time Comparison**: Password verification uses constant-time operations
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::auth::password::{hash_password, verify_password};
/// use tasklist_shared::auth::jwt::{issue_access_token, verify_access_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Token round trip
/// let token = issue_access_token(7, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(verify_access_token(&token, "secret-key-at-least-32-bytes-long!!")?, 7);
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod middleware;
