use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MedicalCondition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub condition: String,
    pub diagnosis_date: NaiveDate,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MedicalConditionRequest {
    #[validate(length(min = 1, max = 500, message = "Condition is required"))]
    pub condition: String,
    pub diagnosis_date: String,
    #[validate(length(max = 2000))]
    pub treatment: Option<String>,
    #[validate(length(max = 2000))]
    pub medications: Option<String>,
}
