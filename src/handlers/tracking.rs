use axum::{
    extract::{Query, State},
    Extension, Json,
};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::tracking::{
    AddSleepRequest, AddWeightRequest, CalorieEntry, CalorieRequest, RangeQuery, SleepEntry,
    WeightEntry,
};
use crate::services::dates::{normalize_date, optional_range};
use crate::AppState;

pub async fn add_weight(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AddWeightRequest>,
) -> AppResult<Json<WeightEntry>> {
    body.validate()?;
    let date = normalize_date(&body.date)?;
    let entry = db::tracking::insert_weight(&state.db, auth_user.id, date, body.weight).await?;
    Ok(Json(entry))
}

pub async fn list_weights(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<WeightEntry>>> {
    let (start, end) = optional_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    Ok(Json(
        db::tracking::list_weights(&state.db, auth_user.id, start, end).await?,
    ))
}

pub async fn add_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AddSleepRequest>,
) -> AppResult<Json<SleepEntry>> {
    body.validate()?;
    let date = normalize_date(&body.date)?;
    let entry =
        db::tracking::insert_sleep(&state.db, auth_user.id, date, body.duration_hours, body.quality)
            .await?;
    Ok(Json(entry))
}

pub async fn list_sleep(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<SleepEntry>>> {
    let (start, end) = optional_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    Ok(Json(
        db::tracking::list_sleep(&state.db, auth_user.id, start, end).await?,
    ))
}

pub async fn add_calories(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CalorieRequest>,
) -> AppResult<Json<CalorieEntry>> {
    body.validate()?;
    let date = normalize_date(&body.date)?;
    let entry = db::tracking::insert_calories(
        &state.db,
        auth_user.id,
        date,
        body.calories_consumed,
        body.calories_burned,
    )
    .await?;
    Ok(Json(entry))
}

/// Corrects the latest calorie row of a day instead of adding another one.
pub async fn update_calories(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CalorieRequest>,
) -> AppResult<Json<CalorieEntry>> {
    body.validate()?;
    let date = normalize_date(&body.date)?;
    let entry = db::tracking::update_latest_calories(
        &state.db,
        auth_user.id,
        date,
        body.calories_consumed,
        body.calories_burned,
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("No calorie entry for {date}")))?;
    Ok(Json(entry))
}

pub async fn list_calories(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<CalorieEntry>>> {
    let (start, end) = optional_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    Ok(Json(
        db::tracking::list_calories(&state.db, auth_user.id, start, end).await?,
    ))
}
