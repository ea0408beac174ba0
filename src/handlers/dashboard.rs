use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::AppResult;
use crate::services::aggregation::aggregate_daily;
use crate::services::dashboard::{today_stats, DashboardResponse, DayRows};
use crate::services::dates::{normalize_or, window_start};
use crate::AppState;

const HISTORY_DAYS: i64 = 7;
const TREND_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
}

/// Keeps a section's rows, or records it as unavailable.
fn section<T>(
    name: &'static str,
    result: Result<T, sqlx::Error>,
    unavailable: &mut Vec<&'static str>,
) -> Option<T> {
    match result {
        Ok(rows) => Some(rows),
        Err(e) => {
            tracing::warn!(section = name, error = %e, "Dashboard section unavailable");
            unavailable.push(name);
            None
        }
    }
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let date = normalize_or(q.date.as_deref(), Utc::now().date_naive())?;
    let history_start = window_start(date, HISTORY_DAYS)?;
    let trend_start = window_start(date, TREND_DAYS)?;
    let (pool, user_id) = (&state.db, auth_user.id);

    let (activities, calories, nutrition, sleep, weights) = tokio::join!(
        db::activity::list(pool, user_id, Some(history_start), Some(date)),
        db::tracking::list_calories(pool, user_id, Some(history_start), Some(date)),
        db::nutrition::list(pool, user_id, Some(history_start), Some(date)),
        db::tracking::list_sleep(pool, user_id, Some(trend_start), Some(date)),
        db::tracking::list_weights(pool, user_id, None, Some(date)),
    );

    let mut unavailable = Vec::new();
    let rows = DayRows {
        activities: section("activities", activities, &mut unavailable),
        calories: section("calories", calories, &mut unavailable),
        nutrition: section("nutrition", nutrition, &mut unavailable),
        sleep: section("sleep", sleep, &mut unavailable),
        weights: section("weight", weights, &mut unavailable),
    };

    let today = today_stats(date, &rows);

    let history = match (&rows.activities, &rows.calories, &rows.nutrition) {
        (Some(a), Some(c), Some(n)) => Some(aggregate_daily(user_id, history_start, date, a, c, n)),
        _ => None,
    };
    let weight_trend = rows
        .weights
        .map(|w| w.into_iter().filter(|e| e.date >= trend_start).collect());

    Ok(Json(DashboardResponse {
        date,
        today,
        history,
        weight_trend,
        sleep_trend: rows.sleep,
        unavailable,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_section_is_reported_and_dropped() {
        let mut unavailable = Vec::new();

        let ok = section("sleep", Ok(vec![1, 2]), &mut unavailable);
        let failed: Option<Vec<i32>> = section("weight", Err(sqlx::Error::PoolTimedOut), &mut unavailable);

        assert_eq!(ok, Some(vec![1, 2]));
        assert_eq!(failed, None);
        assert_eq!(unavailable, vec!["weight"]);
    }
}
