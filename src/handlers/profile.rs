use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::user::{UpdateProfileRequest, UserProfile};
use crate::services::dates::normalize_opt;
use crate::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = db::users::find(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;

    Ok(Json(UserProfile {
        user,
        email: auth_user.email,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    body.validate()?;
    let dob = normalize_opt(body.dob.as_deref())?;

    let user = db::users::upsert_profile(&state.db, auth_user.id, &body, dob).await?;
    tracing::info!(user_id = %auth_user.id, "Profile updated");

    Ok(Json(UserProfile {
        user,
        email: auth_user.email,
    }))
}
