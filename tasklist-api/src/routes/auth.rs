/// Authentication endpoints
///
/// - `POST /api/auth/register` - Create an account
/// - `POST /api/auth/login` - Exchange credentials for a bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklist_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use tracing::{info, warn};
use validator::Validate;

/// Same message for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Runs CPU-bound Argon2 work off the async executor
async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("Password task failed: {}", e)))
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed HS256 token, valid for 30 minutes
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,
}

/// Registers a new user
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "email": "alice@example.com", "password": "s3cret" }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered; the existing account is untouched
/// - `422 Unprocessable Entity`: Invalid email or empty password
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let plain = req.password;
    let password_hash = run_blocking(move || password::hash_password(&plain)).await??;

    let user = state
        .users
        .create_user(CreateUser {
            email: req.email,
            password_hash,
        })
        .await?;

    info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Authenticates a user and issues an access token
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "alice@example.com", "password": "s3cret" }
/// ```
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password, indistinguishably
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let Some(user) = state.users.find_user_by_email(&req.email).await? else {
        // Same Argon2 cost as a real check
        let plain = req.password;
        run_blocking(move || password::verify_dummy(&plain)).await?;
        warn!("Login failed: unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let plain = req.password;
    let stored = user.password_hash.clone();
    let matches = run_blocking(move || password::verify_password(&plain, &stored)).await??;
    if !matches {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = jwt::issue_access_token(user.id, state.jwt_secret())?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
