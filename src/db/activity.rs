use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity::{ActivityEntry, NewActivity};

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    activity: &NewActivity,
    calories_burned: i32,
) -> Result<ActivityEntry, sqlx::Error> {
    sqlx::query_as::<_, ActivityEntry>(
        r#"
        INSERT INTO activity_tracking
            (user_id, date, activity_type, duration_minutes, intensity, calories_burned, description)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(activity.date)
    .bind(activity.activity_type)
    .bind(activity.duration_minutes)
    .bind(activity.intensity)
    .bind(calories_burned)
    .bind(&activity.description)
    .fetch_one(db)
    .await
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<ActivityEntry>, sqlx::Error> {
    sqlx::query_as::<_, ActivityEntry>(
        r#"
        SELECT * FROM activity_tracking
        WHERE user_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

/// Returns whether a row owned by `user_id` was removed.
pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM activity_tracking WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
