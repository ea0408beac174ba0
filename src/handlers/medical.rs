use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::medical::{MedicalCondition, MedicalConditionRequest};
use crate::services::dates::normalize_date;
use crate::AppState;

pub async fn list_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<MedicalCondition>>> {
    Ok(Json(db::medical::list(&state.db, auth_user.id).await?))
}

fn checked(body: &MedicalConditionRequest) -> AppResult<chrono::NaiveDate> {
    body.validate()?;
    if body.condition.trim().is_empty() {
        return Err(AppError::Validation("Condition is required".into()));
    }
    normalize_date(&body.diagnosis_date)
}

pub async fn add_condition(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<MedicalConditionRequest>,
) -> AppResult<Json<MedicalCondition>> {
    let diagnosis_date = checked(&body)?;
    let row = db::medical::insert(&state.db, auth_user.id, &body, diagnosis_date).await?;
    Ok(Json(row))
}

pub async fn update_condition(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(condition_id): Path<Uuid>,
    Json(body): Json<MedicalConditionRequest>,
) -> AppResult<Json<MedicalCondition>> {
    let diagnosis_date = checked(&body)?;
    let row = db::medical::update(&state.db, auth_user.id, condition_id, &body, diagnosis_date)
        .await?
        .ok_or_else(|| AppError::NotFound("Medical record not found".into()))?;
    Ok(Json(row))
}

pub async fn delete_condition(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(condition_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !db::medical::delete(&state.db, auth_user.id, condition_id).await? {
        return Err(AppError::NotFound("Medical record not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
