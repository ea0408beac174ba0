use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::nutrition::{CreateNutritionLogRequest, NutritionLog};

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    req: &CreateNutritionLogRequest,
) -> Result<NutritionLog, sqlx::Error> {
    sqlx::query_as::<_, NutritionLog>(
        r#"
        INSERT INTO nutrition_logs
            (user_id, date, meal, food_items, calories, protein, carbs, fat, fiber)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(req.meal)
    .bind(&req.food_items)
    .bind(req.calories)
    .bind(req.protein)
    .bind(req.carbs)
    .bind(req.fat)
    .bind(req.fiber)
    .fetch_one(db)
    .await
}

pub async fn list(
    db: &PgPool,
    user_id: Uuid,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<NutritionLog>, sqlx::Error> {
    sqlx::query_as::<_, NutritionLog>(
        r#"
        SELECT * FROM nutrition_logs
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

pub async fn recent(db: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<NutritionLog>, sqlx::Error> {
    sqlx::query_as::<_, NutritionLog>(
        r#"
        SELECT * FROM nutrition_logs
        WHERE user_id = $1
        ORDER BY date DESC, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM nutrition_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
