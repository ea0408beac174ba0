use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Profile row. `id` is the identity provider's subject; credentials live there.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub sleep_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50))]
    pub gender: Option<String>,
    pub dob: Option<String>,
    #[validate(range(min = 30.0, max = 300.0, message = "Height must be between 30 and 300 cm"))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 1.0, max = 700.0, message = "Weight must be between 1 and 700 kg"))]
    pub weight_kg: Option<f64>,
    #[validate(range(min = 1.0, max = 700.0, message = "Target weight must be between 1 and 700 kg"))]
    pub target_weight_kg: Option<f64>,
    #[validate(length(max = 50))]
    pub activity_level: Option<String>,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,
}
