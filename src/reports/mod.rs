/// Clinical report records and PDF export
pub mod pdf;

use crate::error::{ClinicError, ClinicResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Stored report row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub user_id: i64,
    pub doctor_name: String,
    pub title: String,
    pub report_date: NaiveDate,
    pub chief_complaint: Option<String>,
    pub clinical_findings: Option<String>,
    pub oral_hygiene: Option<String>,
    pub teeth_condition: Option<String>,
    pub gums: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub medications: Option<String>,
    pub advice: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Report joined with its owning user, for admin listings and PDF export
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReportWithUser {
    pub id: i64,
    pub user_email: String,
    pub user_name: String,
    pub doctor_name: String,
    pub title: String,
    pub report_date: NaiveDate,
    pub chief_complaint: Option<String>,
    pub clinical_findings: Option<String>,
    pub oral_hygiene: Option<String>,
    pub teeth_condition: Option<String>,
    pub gums: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub medications: Option<String>,
    pub advice: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Summary row for the patient's own report list
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: i64,
    pub doctor_name: String,
    pub title: String,
    pub report_date: NaiveDate,
}

/// Upsert payload. Only email, title, and doctor name are required; the
/// clinical fields are optional and replaced wholesale on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportInput {
    pub id: Option<i64>,
    pub user_email: String,
    pub title: String,
    pub doctor_name: String,
    pub report_date: Option<String>,
    pub chief_complaint: Option<String>,
    pub clinical_findings: Option<String>,
    pub oral_hygiene: Option<String>,
    pub teeth_condition: Option<String>,
    pub gums: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub medications: Option<String>,
    pub advice: Option<String>,
}

const SELECT_WITH_USER: &str =
    "SELECT r.id, u.email AS user_email, u.name AS user_name, r.doctor_name, r.title,
            r.report_date, r.chief_complaint, r.clinical_findings, r.oral_hygiene,
            r.teeth_condition, r.gums, r.diagnosis, r.treatment_plan, r.medications,
            r.advice, r.created_at
     FROM reports r JOIN users u ON r.user_id = u.id";

#[derive(Clone)]
pub struct ReportManager {
    db: SqlitePool,
}

impl ReportManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create or update a report. With an id the existing record's fields
    /// are replaced wholesale; without one a new record is created.
    pub async fn upsert(&self, input: ReportInput) -> ClinicResult<i64> {
        if input.user_email.trim().is_empty()
            || input.title.trim().is_empty()
            || input.doctor_name.trim().is_empty()
        {
            return Err(ClinicError::Validation(
                "Basic fields (Email, Doctor, Title) are required".to_string(),
            ));
        }

        let user_id: (i64,) = sqlx::query_as("SELECT id FROM users WHERE email = ?1")
            .bind(&input.user_email)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ClinicError::NotFound("User not found".to_string()))?;

        // Absent or malformed dates default to today.
        let report_date = input
            .report_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
            .unwrap_or_else(|| Utc::now().date_naive());

        match input.id {
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE reports SET user_id = ?1, doctor_name = ?2, title = ?3,
                            report_date = ?4, chief_complaint = ?5, clinical_findings = ?6,
                            oral_hygiene = ?7, teeth_condition = ?8, gums = ?9, diagnosis = ?10,
                            treatment_plan = ?11, medications = ?12, advice = ?13
                     WHERE id = ?14",
                )
                .bind(user_id.0)
                .bind(&input.doctor_name)
                .bind(&input.title)
                .bind(report_date)
                .bind(&input.chief_complaint)
                .bind(&input.clinical_findings)
                .bind(&input.oral_hygiene)
                .bind(&input.teeth_condition)
                .bind(&input.gums)
                .bind(&input.diagnosis)
                .bind(&input.treatment_plan)
                .bind(&input.medications)
                .bind(&input.advice)
                .bind(id)
                .execute(&self.db)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(ClinicError::NotFound("Report not found".to_string()));
                }
                Ok(id)
            }
            None => {
                let result = sqlx::query(
                    "INSERT INTO reports (user_id, doctor_name, title, report_date,
                            chief_complaint, clinical_findings, oral_hygiene, teeth_condition,
                            gums, diagnosis, treatment_plan, medications, advice, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                )
                .bind(user_id.0)
                .bind(&input.doctor_name)
                .bind(&input.title)
                .bind(report_date)
                .bind(&input.chief_complaint)
                .bind(&input.clinical_findings)
                .bind(&input.oral_hygiene)
                .bind(&input.teeth_condition)
                .bind(&input.gums)
                .bind(&input.diagnosis)
                .bind(&input.treatment_plan)
                .bind(&input.medications)
                .bind(&input.advice)
                .bind(Utc::now())
                .execute(&self.db)
                .await?;

                Ok(result.last_insert_rowid())
            }
        }
    }

    /// Delete by id. Unknown ids are a no-op.
    pub async fn delete(&self, id: i64) -> ClinicResult<()> {
        sqlx::query("DELETE FROM reports WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn get_with_user(&self, id: i64) -> ClinicResult<ReportWithUser> {
        let query = format!("{} WHERE r.id = ?1", SELECT_WITH_USER);
        sqlx::query_as::<_, ReportWithUser>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ClinicError::NotFound("Report not found".to_string()))
    }

    pub async fn list_all(&self) -> ClinicResult<Vec<ReportWithUser>> {
        let query = format!("{} ORDER BY r.created_at DESC", SELECT_WITH_USER);
        let rows = sqlx::query_as::<_, ReportWithUser>(&query)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Summary rows for one patient, newest report date first.
    pub async fn list_for_user(&self, email: &str) -> ClinicResult<Vec<ReportSummary>> {
        let user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        let user_id = user
            .ok_or_else(|| ClinicError::NotFound("User not found".to_string()))?
            .0;

        let rows = sqlx::query_as::<_, ReportSummary>(
            "SELECT id, doctor_name, title, report_date FROM reports
             WHERE user_id = ?1 ORDER BY report_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
