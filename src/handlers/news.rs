use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::news::Article;
use crate::AppState;

pub async fn health_news(State(state): State<AppState>) -> AppResult<Json<Vec<Article>>> {
    Ok(Json(state.news.health_headlines().await?))
}
