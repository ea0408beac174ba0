use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatContext {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "chat_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub context_id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContextRequest {
    /// Clients may pick the id so they can render the context before the round trip.
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Context name must be 1-200 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(alias = "contextId")]
    pub context_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMessageRequest {
    #[serde(alias = "contextId")]
    pub context_id: Uuid,
    pub sender: Sender,
    #[validate(length(min = 1, max = 20000, message = "Message must be 1-20000 characters"))]
    #[serde(alias = "message")]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssistantQueryRequest {
    #[serde(alias = "contextId")]
    pub context_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "Query must be 1-4000 characters"))]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantQueryResponse {
    pub response: String,
    pub message: ChatMessage,
}
