/// Doctor roster management
use crate::error::ClinicResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DoctorManager {
    db: SqlitePool,
}

impl DoctorManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn add(
        &self,
        name: &str,
        specialization: &str,
        image: Option<String>,
    ) -> ClinicResult<Doctor> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO doctors (name, specialization, image, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(name)
        .bind(specialization)
        .bind(&image)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Doctor {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            specialization: specialization.to_string(),
            image,
            created_at: now,
        })
    }

    /// Delete by id. Unknown ids are a no-op, matching the admin UI's
    /// fire-and-forget remove button.
    pub async fn delete(&self, id: i64) -> ClinicResult<()> {
        sqlx::query("DELETE FROM doctors WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn list_all(&self) -> ClinicResult<Vec<Doctor>> {
        let rows = sqlx::query_as::<_, Doctor>("SELECT * FROM doctors ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> ClinicResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM doctors")
            .fetch_one(&self.db)
            .await?;
        Ok(row.0)
    }
}
