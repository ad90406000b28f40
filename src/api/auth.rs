use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::repositories;
use crate::schemas::auth::{GetUserIdRequest, UserIdResponse, UserLoginRequest, UserResponse};
use crate::services::google_auth::AuthError;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/login", post(login)).route("/get-user-id", post(get_user_id))
}

/// Verifies the Google ID token and returns the matching user row, creating
/// it on first login. The returned id doubles as the bearer token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLoginRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state.google().verify(&payload.id_token, &payload.email).await.map_err(|err| match err {
        AuthError::NotConfigured => ApiError::Internal("Google sign-in is not configured".into()),
        AuthError::Transport(err) => ApiError::internal(err, "Failed to verify Google token"),
        AuthError::InvalidToken | AuthError::EmailMismatch => {
            ApiError::Unauthorized("Invalid authentication credentials")
        }
    })?;

    let user = repositories::users::find_or_create(
        state.db(),
        repositories::users::CreateUser {
            email: payload.email.trim(),
            given_name: payload.given_name.as_deref(),
            family_name: payload.family_name.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    let response = UserResponse {
        id: user.id,
        email: user.email,
        given_name: user.given_name,
        family_name: user.family_name,
        created_at: format_primitive(user.created_at),
    };

    Ok((StatusCode::OK, Json(response)))
}

async fn get_user_id(
    State(state): State<AppState>,
    Json(payload): Json<GetUserIdRequest>,
) -> Result<Json<UserIdResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let id = repositories::users::find_id_by_email(state.db(), payload.email.trim())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserIdResponse { id }))
}
