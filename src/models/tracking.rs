use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddWeightRequest {
    pub date: String,
    #[validate(range(min = 1.0, max = 700.0, message = "Weight must be between 1 and 700 kg"))]
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "sleep_quality")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SleepEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub duration_hours: f64,
    pub quality: SleepQuality,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddSleepRequest {
    pub date: String,
    #[validate(range(min = 0.0, max = 24.0, message = "Sleep duration must be between 0 and 24 hours"))]
    pub duration_hours: f64,
    pub quality: SleepQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalorieEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub calories_consumed: i32,
    pub calories_burned: i32,
    /// Stored generated column: `calories_consumed - calories_burned`.
    pub net_calories: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Used for both `POST` (insert) and `PUT` (update latest row for the date).
#[derive(Debug, Deserialize, Validate)]
pub struct CalorieRequest {
    pub date: String,
    #[validate(range(min = 0, max = 50000, message = "Calories consumed must be between 0 and 50000"))]
    pub calories_consumed: i32,
    #[validate(range(min = 0, max = 50000, message = "Calories burned must be between 0 and 50000"))]
    pub calories_burned: i32,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
