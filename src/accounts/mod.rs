/// User accounts, login history, and admin credentials
use crate::auth;
use crate::error::{ClinicError, ClinicResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Patient account record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: Option<i64>,
    pub blood_type: Option<String>,
    pub gender: Option<String>,
    pub profile_pic: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only login audit row. Stores the hash current at login time,
/// never the plaintext.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LoginHistoryEntry {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub login_time: DateTime<Utc>,
}

/// Admin credential record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AdminCredential {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Fields for a new signup
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: Option<i64>,
    pub blood_type: Option<String>,
    pub gender: Option<String>,
    pub profile_pic: Option<String>,
}

/// Profile fields a user may change. Optional demographics overwrite
/// wholesale; the picture only when a new upload was supplied.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: Option<i64>,
    pub blood_type: Option<String>,
    pub gender: Option<String>,
    pub profile_pic: Option<String>,
}

/// User account manager service
#[derive(Clone)]
pub struct UserManager {
    db: SqlitePool,
}

impl UserManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Register a new user. Email must be unique; password is stored as an
    /// Argon2 hash.
    pub async fn create(&self, new_user: NewUser) -> ClinicResult<User> {
        if self.email_exists(&new_user.email).await? {
            return Err(ClinicError::Validation(
                "Email already exists. Please use a different email.".to_string(),
            ));
        }

        let password_hash = auth::hash_password(&new_user.password)?;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, age, blood_type, gender, profile_pic, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.age)
        .bind(&new_user.blood_type)
        .bind(&new_user.gender)
        .bind(&new_user.profile_pic)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: new_user.name,
            email: new_user.email,
            password_hash,
            age: new_user.age,
            blood_type: new_user.blood_type,
            gender: new_user.gender,
            profile_pic: new_user.profile_pic,
            created_at: now,
        })
    }

    pub async fn email_exists(&self, email: &str) -> ClinicResult<bool> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.db)
            .await?;
        Ok(row.0 > 0)
    }

    pub async fn get_by_email(&self, email: &str) -> ClinicResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ClinicError::NotFound("User not found".to_string()))
    }

    /// Verify credentials and append a login-history row.
    pub async fn login(&self, email: &str, password: &str) -> ClinicResult<User> {
        let user = match self.get_by_email(email).await {
            Ok(user) => user,
            Err(ClinicError::NotFound(_)) => {
                return Err(ClinicError::Validation(
                    "Email not found. Please sign up first.".to_string(),
                ))
            }
            Err(other) => return Err(other),
        };

        if !auth::verify_password(password, &user.password_hash) {
            return Err(ClinicError::Validation("Incorrect password".to_string()));
        }

        sqlx::query(
            "INSERT INTO login_history (email, password_hash, login_time) VALUES (?1, ?2, ?3)",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn update_profile(&self, email: &str, update: ProfileUpdate) -> ClinicResult<User> {
        let mut user = self.get_by_email(email).await?;

        user.name = update.name;
        user.age = update.age;
        user.blood_type = update.blood_type;
        user.gender = update.gender;
        if let Some(pic) = update.profile_pic {
            user.profile_pic = Some(pic);
        }

        sqlx::query(
            "UPDATE users SET name = ?1, age = ?2, blood_type = ?3, gender = ?4, profile_pic = ?5
             WHERE email = ?6",
        )
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.blood_type)
        .bind(&user.gender)
        .bind(&user.profile_pic)
        .bind(email)
        .execute(&self.db)
        .await?;

        Ok(user)
    }

    pub async fn list_all(&self) -> ClinicResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> ClinicResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(row.0)
    }

    #[cfg(test)]
    pub async fn login_history(&self, email: &str) -> ClinicResult<Vec<LoginHistoryEntry>> {
        let rows = sqlx::query_as::<_, LoginHistoryEntry>(
            "SELECT * FROM login_history WHERE email = ?1 ORDER BY login_time DESC",
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

/// Admin credential manager service
#[derive(Clone)]
pub struct AdminManager {
    db: SqlitePool,
}

impl AdminManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Seed an admin account (used by ops tooling and tests).
    pub async fn seed(&self, username: &str, password: &str) -> ClinicResult<()> {
        let password_hash = auth::hash_password(password)?;
        sqlx::query("INSERT OR IGNORE INTO admins (username, password_hash) VALUES (?1, ?2)")
            .bind(username)
            .bind(&password_hash)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Verify admin credentials. Username matching is case-insensitive.
    pub async fn login(&self, username: &str, password: &str) -> ClinicResult<AdminCredential> {
        let admin = sqlx::query_as::<_, AdminCredential>(
            "SELECT * FROM admins WHERE username = ?1 COLLATE NOCASE",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ClinicError::Validation("Admin not found".to_string()))?;

        if !auth::verify_password(password, &admin.password_hash) {
            return Err(ClinicError::Validation("Incorrect password".to_string()));
        }

        Ok(admin)
    }

    /// Replace the admin username/password. Targets `current_username` when
    /// given, otherwise the first admin row.
    pub async fn update_credentials(
        &self,
        new_username: &str,
        new_password: &str,
        current_username: Option<&str>,
    ) -> ClinicResult<()> {
        let admin = match current_username {
            Some(current) => {
                sqlx::query_as::<_, AdminCredential>("SELECT * FROM admins WHERE username = ?1")
                    .bind(current)
                    .fetch_optional(&self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, AdminCredential>("SELECT * FROM admins ORDER BY id LIMIT 1")
                    .fetch_optional(&self.db)
                    .await?
            }
        }
        .ok_or_else(|| ClinicError::NotFound("Admin not found".to_string()))?;

        let password_hash = auth::hash_password(new_password)?;
        sqlx::query("UPDATE admins SET username = ?1, password_hash = ?2 WHERE id = ?3")
            .bind(new_username)
            .bind(&password_hash)
            .bind(admin.id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    fn alice() -> NewUser {
        NewUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "secret-pw".into(),
            age: Some(30),
            blood_type: Some("O+".into()),
            gender: Some("female".into()),
            profile_pic: None,
        }
    }

    #[tokio::test]
    async fn signup_stores_hash_not_plaintext() {
        let mgr = UserManager::new(memory_pool().await.unwrap());
        let user = mgr.create(alice()).await.unwrap();
        assert_ne!(user.password_hash, "secret-pw");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn duplicate_email_rejected_without_new_row() {
        let mgr = UserManager::new(memory_pool().await.unwrap());
        mgr.create(alice()).await.unwrap();

        let err = mgr.create(alice()).await.unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));
        assert_eq!(mgr.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn login_appends_history_with_hash() {
        let mgr = UserManager::new(memory_pool().await.unwrap());
        let created = mgr.create(alice()).await.unwrap();

        let user = mgr.login("alice@example.com", "secret-pw").await.unwrap();
        assert_eq!(user.id, created.id);

        let history = mgr.login_history("alice@example.com").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].password_hash, created.password_hash);
    }

    #[tokio::test]
    async fn login_wrong_password_and_unknown_email() {
        let mgr = UserManager::new(memory_pool().await.unwrap());
        mgr.create(alice()).await.unwrap();

        let err = mgr.login("alice@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));

        let err = mgr.login("nobody@example.com", "secret-pw").await.unwrap_err();
        assert!(matches!(err, ClinicError::Validation(_)));

        assert!(mgr.login_history("alice@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_update_keeps_picture_when_absent() {
        let mgr = UserManager::new(memory_pool().await.unwrap());
        let mut new_user = alice();
        new_user.profile_pic = Some("/uploads/old.png".into());
        mgr.create(new_user).await.unwrap();

        let updated = mgr
            .update_profile(
                "alice@example.com",
                ProfileUpdate {
                    name: "Alice B.".into(),
                    age: Some(31),
                    blood_type: None,
                    gender: None,
                    profile_pic: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice B.");
        assert_eq!(updated.profile_pic.as_deref(), Some("/uploads/old.png"));
        assert_eq!(updated.blood_type, None);
    }

    #[tokio::test]
    async fn admin_login_is_case_insensitive() {
        let mgr = AdminManager::new(memory_pool().await.unwrap());
        mgr.seed("dentalexperts", "admin-pw").await.unwrap();

        assert!(mgr.login("DentalExperts", "admin-pw").await.is_ok());
        assert!(mgr.login("dentalexperts", "wrong").await.is_err());
        assert!(mgr.login("ghost", "admin-pw").await.is_err());
    }

    #[tokio::test]
    async fn admin_credential_rotation() {
        let pool = memory_pool().await.unwrap();
        let mgr = AdminManager::new(pool);
        mgr.seed("dentalexperts", "admin-pw").await.unwrap();

        mgr.update_credentials("frontdesk", "new-pw", Some("dentalexperts"))
            .await
            .unwrap();
        assert!(mgr.login("frontdesk", "new-pw").await.is_ok());
        assert!(mgr.login("dentalexperts", "admin-pw").await.is_err());

        // No admin row matching the filter
        let err = mgr
            .update_credentials("x", "y", Some("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClinicError::NotFound(_)));
    }
}
