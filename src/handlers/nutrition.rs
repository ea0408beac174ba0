use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::nutrition::{
    AnalyzeTextRequest, AnalyzeTextResponse, CreateNutritionLogRequest, NutritionLog,
};
use crate::models::tracking::RangeQuery;
use crate::services::dates::{normalize_date, optional_range};
use crate::services::prompt::{nutrition_prompt, parse_nutrition_response};
use crate::AppState;

/// Asks the model for a structured breakdown of free-text food. Any failure
/// to get well-formed JSON back is an upstream error; no partial analysis is
/// returned.
pub async fn analyze_text(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AnalyzeTextRequest>,
) -> AppResult<Json<AnalyzeTextResponse>> {
    let food_text = body
        .food_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Food text is required".into()))?;

    let reply = state.llm.generate(&nutrition_prompt(food_text)).await?;
    let analysis = parse_nutrition_response(&reply)?;

    tracing::debug!(user_id = %auth_user.id, calories = analysis.calories, "Nutrition analyzed");
    Ok(Json(AnalyzeTextResponse {
        success: true,
        analysis,
    }))
}

pub async fn create_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateNutritionLogRequest>,
) -> AppResult<Json<NutritionLog>> {
    body.validate()?;
    let date = normalize_date(&body.date)?;
    let log = db::nutrition::insert(&state.db, auth_user.id, date, &body).await?;
    Ok(Json(log))
}

pub async fn list_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<NutritionLog>>> {
    let (start, end) = optional_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    Ok(Json(
        db::nutrition::list(&state.db, auth_user.id, start, end).await?,
    ))
}

pub async fn delete_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(log_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !db::nutrition::delete(&state.db, auth_user.id, log_id).await? {
        return Err(AppError::NotFound("Nutrition log not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
