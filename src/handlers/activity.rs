use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::activity::{ActivityEntry, ActivityQuery, DailySummary, LogActivityRequest};
use crate::services::aggregation::aggregate_daily;
use crate::services::calories::estimate_calories;
use crate::services::dates::{optional_range, resolve_range};
use crate::AppState;

const SUMMARY_DEFAULT_DAYS: i64 = 7;

/// Stores an activity with its calories estimated from the user's latest
/// known weight.
pub async fn log_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<LogActivityRequest>,
) -> AppResult<Json<ActivityEntry>> {
    let activity = body.into_new_activity()?;

    let weight_kg = db::users::current_weight_kg(&state.db, auth_user.id).await?;
    let kcal = estimate_calories(
        activity.activity_type,
        f64::from(activity.duration_minutes),
        activity.intensity,
        weight_kg,
    )?;
    let kcal = i32::try_from(kcal)
        .map_err(|_| AppError::InvalidArgument("Calorie estimate is out of range".into()))?;

    let entry = db::activity::insert(&state.db, auth_user.id, &activity, kcal).await?;
    tracing::debug!(
        user_id = %auth_user.id,
        activity = %activity.activity_type,
        kcal,
        "Activity logged"
    );
    Ok(Json(entry))
}

pub async fn list_activities(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    let (start, end) = optional_range(q.start_date.as_deref(), q.end_date.as_deref())?;
    Ok(Json(
        db::activity::list(&state.db, auth_user.id, start, end).await?,
    ))
}

/// Daily roll-up over `[start_date, end_date]`, last 7 days by default.
pub async fn activity_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<ActivityQuery>,
) -> AppResult<Json<Vec<DailySummary>>> {
    let (start, end) = resolve_range(
        q.start_date.as_deref(),
        q.end_date.as_deref(),
        SUMMARY_DEFAULT_DAYS,
    )?;

    let (activities, calories, nutrition) = tokio::try_join!(
        db::activity::list(&state.db, auth_user.id, Some(start), Some(end)),
        db::tracking::list_calories(&state.db, auth_user.id, Some(start), Some(end)),
        db::nutrition::list(&state.db, auth_user.id, Some(start), Some(end)),
    )?;

    Ok(Json(aggregate_daily(
        auth_user.id,
        start,
        end,
        &activities,
        &calories,
        &nutrition,
    )))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(activity_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !db::activity::delete(&state.db, auth_user.id, activity_id).await? {
        return Err(AppError::NotFound("Activity not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}
