//! Weight, sleep and daily calorie rows. Same-day duplicates are kept; readers
//! that need one value per day take the most recently created row.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::tracking::{CalorieEntry, SleepEntry, SleepQuality, WeightEntry};

pub async fn insert_weight(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    weight: f64,
) -> Result<WeightEntry, sqlx::Error> {
    sqlx::query_as::<_, WeightEntry>(
        "INSERT INTO weight_tracking (user_id, date, weight) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(user_id)
    .bind(date)
    .bind(weight)
    .fetch_one(db)
    .await
}

/// Weigh-ins in `[start, end]`, either bound optional, newest first.
pub async fn list_weights(
    db: &PgPool,
    user_id: Uuid,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<WeightEntry>, sqlx::Error> {
    sqlx::query_as::<_, WeightEntry>(
        r#"
        SELECT * FROM weight_tracking
        WHERE user_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
        ORDER BY date DESC, created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn recent_weights(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<WeightEntry>, sqlx::Error> {
    sqlx::query_as::<_, WeightEntry>(
        r#"
        SELECT * FROM weight_tracking
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn insert_sleep(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    duration_hours: f64,
    quality: SleepQuality,
) -> Result<SleepEntry, sqlx::Error> {
    sqlx::query_as::<_, SleepEntry>(
        r#"
        INSERT INTO sleep_tracking (user_id, date, duration_hours, quality)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(duration_hours)
    .bind(quality)
    .fetch_one(db)
    .await
}

pub async fn list_sleep(
    db: &PgPool,
    user_id: Uuid,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<SleepEntry>, sqlx::Error> {
    sqlx::query_as::<_, SleepEntry>(
        r#"
        SELECT * FROM sleep_tracking
        WHERE user_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
        ORDER BY date DESC, created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn recent_sleep(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<SleepEntry>, sqlx::Error> {
    sqlx::query_as::<_, SleepEntry>(
        r#"
        SELECT * FROM sleep_tracking
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn insert_calories(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    consumed: i32,
    burned: i32,
) -> Result<CalorieEntry, sqlx::Error> {
    sqlx::query_as::<_, CalorieEntry>(
        r#"
        INSERT INTO daily_calories (user_id, date, calories_consumed, calories_burned)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(consumed)
    .bind(burned)
    .fetch_one(db)
    .await
}

/// Overwrites the latest calorie row for `date`. `None` when the user has no
/// row for that day.
pub async fn update_latest_calories(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    consumed: i32,
    burned: i32,
) -> Result<Option<CalorieEntry>, sqlx::Error> {
    sqlx::query_as::<_, CalorieEntry>(
        r#"
        UPDATE daily_calories
        SET calories_consumed = $3, calories_burned = $4, updated_at = now()
        WHERE id = (
            SELECT id FROM daily_calories
            WHERE user_id = $1 AND date = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
        )
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(consumed)
    .bind(burned)
    .fetch_optional(db)
    .await
}

pub async fn list_calories(
    db: &PgPool,
    user_id: Uuid,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<CalorieEntry>, sqlx::Error> {
    sqlx::query_as::<_, CalorieEntry>(
        r#"
        SELECT * FROM daily_calories
        WHERE user_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
        ORDER BY date DESC, created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn recent_calories(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<CalorieEntry>, sqlx::Error> {
    sqlx::query_as::<_, CalorieEntry>(
        r#"
        SELECT * FROM daily_calories
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}
