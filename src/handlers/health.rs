use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Ready when the database answers. Missing provider keys are reported but do
/// not fail the probe; only the endpoints that need them degrade.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let configured = |key: &str| if key.is_empty() { "missing_key" } else { "configured" };
    let database = if db_ok { "ok" } else { "failed" };
    let checks = json!({
        "database": database,
        "llm": configured(state.config.gemini_api_key.as_str()),
        "news": configured(state.config.gnews_api_key.as_str()),
    });

    if db_ok {
        (StatusCode::OK, Json(json!({ "status": "ready", "checks": checks })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "checks": checks })),
        )
    }
}
