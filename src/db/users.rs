use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{UpdateProfileRequest, User};

pub async fn find(db: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Inserts the profile or updates it in place. Fields absent from the
/// request keep their stored value.
pub async fn upsert_profile(
    db: &PgPool,
    user_id: Uuid,
    req: &UpdateProfileRequest,
    dob: Option<NaiveDate>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, gender, dob, height_cm, weight_kg, target_weight_kg, activity_level, sleep_hours)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            gender = COALESCE(EXCLUDED.gender, users.gender),
            dob = COALESCE(EXCLUDED.dob, users.dob),
            height_cm = COALESCE(EXCLUDED.height_cm, users.height_cm),
            weight_kg = COALESCE(EXCLUDED.weight_kg, users.weight_kg),
            target_weight_kg = COALESCE(EXCLUDED.target_weight_kg, users.target_weight_kg),
            activity_level = COALESCE(EXCLUDED.activity_level, users.activity_level),
            sleep_hours = COALESCE(EXCLUDED.sleep_hours, users.sleep_hours),
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&req.gender)
    .bind(dob)
    .bind(req.height_cm)
    .bind(req.weight_kg)
    .bind(req.target_weight_kg)
    .bind(&req.activity_level)
    .bind(req.sleep_hours)
    .fetch_one(db)
    .await
}

/// Weight used for calorie estimates: the latest weigh-in, else the profile
/// weight. `None` when neither exists.
pub async fn current_weight_kg(db: &PgPool, user_id: Uuid) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT COALESCE(
            (SELECT weight FROM weight_tracking
             WHERE user_id = $1
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT 1),
            (SELECT weight_kg FROM users WHERE id = $1)
        )
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await
}
