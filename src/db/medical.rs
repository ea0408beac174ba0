use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::medical::{MedicalCondition, MedicalConditionRequest};

pub async fn list(db: &PgPool, user_id: Uuid) -> Result<Vec<MedicalCondition>, sqlx::Error> {
    sqlx::query_as::<_, MedicalCondition>(
        r#"
        SELECT * FROM medical_history
        WHERE user_id = $1
        ORDER BY diagnosis_date DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    req: &MedicalConditionRequest,
    diagnosis_date: NaiveDate,
) -> Result<MedicalCondition, sqlx::Error> {
    sqlx::query_as::<_, MedicalCondition>(
        r#"
        INSERT INTO medical_history (user_id, condition, diagnosis_date, treatment, medications)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(req.condition.trim())
    .bind(diagnosis_date)
    .bind(&req.treatment)
    .bind(&req.medications)
    .fetch_one(db)
    .await
}

/// `None` when no row with `id` belongs to `user_id`.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    req: &MedicalConditionRequest,
    diagnosis_date: NaiveDate,
) -> Result<Option<MedicalCondition>, sqlx::Error> {
    sqlx::query_as::<_, MedicalCondition>(
        r#"
        UPDATE medical_history
        SET condition = $3, diagnosis_date = $4, treatment = $5, medications = $6,
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(req.condition.trim())
    .bind(diagnosis_date)
    .bind(&req.treatment)
    .bind(&req.medications)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM medical_history WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
