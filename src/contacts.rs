/// Contact inquiries (write-once)
use crate::error::ClinicResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct ContactManager {
    db: SqlitePool,
}

impl ContactManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> ClinicResult<Contact> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO contacts (name, email, phone, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(message)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Contact {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            message: message.to_string(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn create_persists_inquiry() {
        let mgr = ContactManager::new(memory_pool().await.unwrap());
        let contact = mgr
            .create("Bob", "bob@example.com", "555-0101", "Do you do implants?")
            .await
            .unwrap();
        assert!(contact.id > 0);
        assert_eq!(contact.message, "Do you do implants?");
    }
}
