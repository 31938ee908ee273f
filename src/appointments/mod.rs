/// Appointment booking and lifecycle management
use crate::error::{ClinicError, ClinicResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Closed appointment status set. Input is normalized at the boundary:
/// empty/whitespace maps to the default, anything else unknown is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Rescheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Rescheduled => "Rescheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse client-supplied status text. Empty input falls back to the
    /// default (`Scheduled`); unknown values are a validation failure.
    pub fn parse(input: &str) -> ClinicResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(AppointmentStatus::Scheduled);
        }

        match trimmed.to_lowercase().as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "rescheduled" => Ok(AppointmentStatus::Rescheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ClinicError::Validation(format!(
                "Invalid appointment status: {}",
                trimmed
            ))),
        }
    }

    /// Statuses whose update triggers a patient notification.
    pub fn notifies_patient(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Rescheduled | AppointmentStatus::Completed
        )
    }
}

/// Appointment record. Patient and doctor fields are free text, not
/// foreign keys — kept for compatibility with the existing frontend.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub doctor: String,
    pub appointment_date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields an admin update may overwrite. `None` (or empty for doctor,
/// malformed for date) means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentUpdate {
    pub status: Option<String>,
    pub date: Option<String>,
    pub doctor: Option<String>,
}

/// Parse a textual appointment timestamp. Accepts RFC 3339 and the common
/// date/date-time shapes the booking form produces; naive values are taken
/// as UTC.
pub fn parse_appointment_date(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

/// Appointment manager service
#[derive(Clone)]
pub struct AppointmentManager {
    db: SqlitePool,
}

impl AppointmentManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Book a new appointment with the default status.
    pub async fn book(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        doctor: &str,
        date: DateTime<Utc>,
    ) -> ClinicResult<Appointment> {
        let now = Utc::now();
        let status = AppointmentStatus::Scheduled;

        let result = sqlx::query(
            "INSERT INTO appointments (name, email, phone, doctor, appointment_date, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(doctor)
        .bind(date)
        .bind(status)
        .bind(now)
        .execute(&self.db)
        .await?;

        Ok(Appointment {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            doctor: doctor.to_string(),
            appointment_date: date,
            status,
            created_at: now,
        })
    }

    pub async fn get(&self, id: i64) -> ClinicResult<Appointment> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ClinicError::NotFound("Appointment not found".to_string()))
    }

    /// Apply an admin update. Status text is normalized; doctor overwrites
    /// only when non-empty; malformed date text is ignored, leaving the
    /// stored value unchanged.
    pub async fn update(&self, id: i64, update: AppointmentUpdate) -> ClinicResult<Appointment> {
        let mut appointment = self.get(id).await?;

        if let Some(raw_status) = update.status {
            appointment.status = AppointmentStatus::parse(&raw_status)?;
        }

        if let Some(doctor) = update.doctor {
            if !doctor.trim().is_empty() {
                appointment.doctor = doctor;
            }
        }

        if let Some(raw_date) = update.date {
            if let Some(parsed) = parse_appointment_date(&raw_date) {
                appointment.appointment_date = parsed;
            }
        }

        sqlx::query(
            "UPDATE appointments SET status = ?1, doctor = ?2, appointment_date = ?3 WHERE id = ?4",
        )
        .bind(appointment.status)
        .bind(&appointment.doctor)
        .bind(appointment.appointment_date)
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(appointment)
    }

    /// Appointments for one patient, newest appointment date first.
    pub async fn list_for_email(&self, email: &str) -> ClinicResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE email = ?1 ORDER BY appointment_date DESC",
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    /// All appointments, newest appointment date first.
    pub async fn list_all(&self) -> ClinicResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments ORDER BY appointment_date DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> ClinicResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments")
            .fetch_one(&self.db)
            .await?;
        Ok(count.0)
    }
}
