use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::chat::{
    AddMessageRequest, AssistantQueryRequest, AssistantQueryResponse, ChatContext, ChatMessage,
    CreateContextRequest, MessagesQuery, Sender,
};
use crate::services::prompt::{build_prompt, AssistantLogs, HISTORY_LIMIT, RECENT_LOG_LIMIT};
use crate::AppState;

async fn owned_context(state: &AppState, user_id: Uuid, context_id: Uuid) -> AppResult<ChatContext> {
    db::chat::find_context(&state.db, user_id, context_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat context not found".into()))
}

pub async fn list_contexts(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<ChatContext>>> {
    Ok(Json(db::chat::list_contexts(&state.db, auth_user.id).await?))
}

pub async fn create_context(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateContextRequest>,
) -> AppResult<Json<ChatContext>> {
    body.validate()?;
    let id = body.id.unwrap_or_else(Uuid::new_v4);
    let context = db::chat::create_context(&state.db, auth_user.id, id, body.name.trim()).await?;
    Ok(Json(context))
}

pub async fn delete_context(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(context_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !db::chat::delete_context(&state.db, auth_user.id, context_id).await? {
        return Err(AppError::NotFound("Chat context not found".into()));
    }
    Ok(Json(serde_json::json!({ "deleted": true })))
}

pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(q): Query<MessagesQuery>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    let context = owned_context(&state, auth_user.id, q.context_id).await?;
    Ok(Json(db::chat::list_messages(&state.db, context.id).await?))
}

pub async fn add_message(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AddMessageRequest>,
) -> AppResult<Json<ChatMessage>> {
    body.validate()?;
    let context = owned_context(&state, auth_user.id, body.context_id).await?;
    let message = db::chat::insert_message(&state.db, context.id, body.sender, &body.text).await?;
    Ok(Json(message))
}

/// Answers a question using the user's profile, recent logs and the
/// conversation so far. Both turns are stored only once the model answered.
pub async fn query(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<AssistantQueryRequest>,
) -> AppResult<Json<AssistantQueryResponse>> {
    body.validate()?;
    let query = body.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Query is required".into()));
    }
    let context = owned_context(&state, auth_user.id, body.context_id).await?;

    let limit = RECENT_LOG_LIMIT as i64;
    let (profile, calories, sleep, weight, nutrition, medical, history) = tokio::try_join!(
        db::users::find(&state.db, auth_user.id),
        db::tracking::recent_calories(&state.db, auth_user.id, limit),
        db::tracking::recent_sleep(&state.db, auth_user.id, limit),
        db::tracking::recent_weights(&state.db, auth_user.id, limit),
        db::nutrition::recent(&state.db, auth_user.id, limit),
        db::medical::list(&state.db, auth_user.id),
        db::chat::recent_messages(&state.db, context.id, HISTORY_LIMIT as i64),
    )?;

    let logs = AssistantLogs {
        calories,
        sleep,
        weight,
        nutrition,
        medical,
    };
    let prompt = build_prompt(
        profile.as_ref(),
        &logs,
        &history,
        query,
        state.config.assistant_max_prompt_chars,
    );

    let reply = state.llm.generate(&prompt).await?;

    db::chat::insert_message(&state.db, context.id, Sender::User, query).await?;
    let message = db::chat::insert_message(&state.db, context.id, Sender::Assistant, &reply).await?;

    tracing::info!(
        user_id = %auth_user.id,
        context_id = %context.id,
        prompt_chars = prompt.len(),
        "Assistant replied"
    );

    Ok(Json(AssistantQueryResponse {
        response: reply,
        message,
    }))
}
