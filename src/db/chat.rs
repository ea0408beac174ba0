use sqlx::PgPool;
use uuid::Uuid;

use crate::models::chat::{ChatContext, ChatMessage, Sender};

pub async fn list_contexts(db: &PgPool, user_id: Uuid) -> Result<Vec<ChatContext>, sqlx::Error> {
    sqlx::query_as::<_, ChatContext>(
        "SELECT * FROM chat_contexts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn create_context(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    name: &str,
) -> Result<ChatContext, sqlx::Error> {
    sqlx::query_as::<_, ChatContext>(
        "INSERT INTO chat_contexts (id, user_id, name) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(name)
    .fetch_one(db)
    .await
}

/// The context, only if it belongs to `user_id`.
pub async fn find_context(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<ChatContext>, sqlx::Error> {
    sqlx::query_as::<_, ChatContext>("SELECT * FROM chat_contexts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Messages are removed by the foreign key cascade.
pub async fn delete_context(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM chat_contexts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// All messages of a context, oldest first.
pub async fn list_messages(db: &PgPool, context_id: Uuid) -> Result<Vec<ChatMessage>, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(
        "SELECT * FROM chat_messages WHERE context_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(context_id)
    .fetch_all(db)
    .await
}

/// The last `limit` messages of a context, returned oldest first.
pub async fn recent_messages(
    db: &PgPool,
    context_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let mut messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT * FROM chat_messages
        WHERE context_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(context_id)
    .bind(limit)
    .fetch_all(db)
    .await?;
    messages.reverse();
    Ok(messages)
}

pub async fn insert_message(
    db: &PgPool,
    context_id: Uuid,
    sender: Sender,
    text: &str,
) -> Result<ChatMessage, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(
        "INSERT INTO chat_messages (context_id, sender, text) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(context_id)
    .bind(sender)
    .bind(text)
    .fetch_one(db)
    .await
}
