/// Doctor ratings and reviews
use crate::error::{ClinicError, ClinicResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub doctor_name: String,
    pub user_email: String,
    pub user_name: String,
    pub rating: i64,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
}

/// Score must be an integer 1..=5. The storage layer does not enforce
/// this, so every write path validates here.
pub fn validate_score(score: i64) -> ClinicResult<i64> {
    if (1..=5).contains(&score) {
        Ok(score)
    } else {
        Err(ClinicError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ))
    }
}

#[derive(Clone)]
pub struct RatingManager {
    db: SqlitePool,
}

impl RatingManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn submit(
        &self,
        doctor_name: &str,
        user_email: &str,
        user_name: &str,
        score: i64,
        review_text: &str,
    ) -> ClinicResult<Rating> {
        let score = validate_score(score)?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO ratings (doctor_name, user_email, user_name, rating, review_text, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(doctor_name)
        .bind(user_email)
        .bind(user_name)
        .bind(score)
        .bind(review_text)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Rating {
            id: result.last_insert_rowid(),
            doctor_name: doctor_name.to_string(),
            user_email: user_email.to_string(),
            user_name: user_name.to_string(),
            rating: score,
            review_text: review_text.to_string(),
            created_at: now,
        })
    }

    pub async fn list_all(&self) -> ClinicResult<Vec<Rating>> {
        let rows = sqlx::query_as::<_, Rating>("SELECT * FROM ratings ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Owner-scoped update: the id and email must both match. A mismatch
    /// reports the same error as a missing rating.
    pub async fn update(
        &self,
        id: i64,
        user_email: &str,
        score: i64,
        review_text: &str,
    ) -> ClinicResult<()> {
        let score = validate_score(score)?;

        let result =
            sqlx::query("UPDATE ratings SET rating = ?1, review_text = ?2 WHERE id = ?3 AND user_email = ?4")
                .bind(score)
                .bind(review_text)
                .bind(id)
                .bind(user_email)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ClinicError::NotFound(
                "Rating not found or you do not have permission to edit".to_string(),
            ));
        }
        Ok(())
    }

    /// Delete a rating. Admins may delete any; users only their own.
    pub async fn delete(&self, id: i64, user_email: Option<&str>, is_admin: bool) -> ClinicResult<()> {
        let result = if is_admin {
            sqlx::query("DELETE FROM ratings WHERE id = ?1")
                .bind(id)
                .execute(&self.db)
                .await?
        } else {
            sqlx::query("DELETE FROM ratings WHERE id = ?1 AND user_email = ?2")
                .bind(id)
                .bind(user_email.unwrap_or(""))
                .execute(&self.db)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(ClinicError::NotFound(
                "Rating not found or you do not have permission to delete".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn count(&self) -> ClinicResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ratings")
            .fetch_one(&self.db)
            .await?;
        Ok(row.0)
    }
}
