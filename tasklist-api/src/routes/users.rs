/// Account endpoints for the authenticated user
///
/// - `GET /api/users/me`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::UserResponse,
};
use axum::{extract::State, Extension, Json};
use tasklist_shared::auth::middleware::AuthUser;

/// Returns the caller's account
///
/// # Errors
///
/// - `404 Not Found`: The token is valid but the account no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
