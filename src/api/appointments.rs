/// Booking, patient appointment listing, and the admin status-update flow
use super::envelope::{self, invalid_method};
use crate::{
    appointments::{parse_appointment_date, AppointmentUpdate},
    context::AppContext,
    error::{ClinicError, ClinicResult},
    notify::Notification,
};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/appointment", post(book).fallback(invalid_method))
        .route("/my-appointments", get(my_appointments))
        .route(
            "/api/update-appointment",
            post(update_appointment).fallback(invalid_method),
        )
}

#[derive(Deserialize)]
struct BookingRequest {
    name: Option<String>,
    email: Option<String>,
    number: Option<String>,
    doctor: Option<String>,
    #[serde(rename = "appointmentDate")]
    appointment_date: Option<String>,
}

async fn book(State(ctx): State<AppContext>, Json(req): Json<BookingRequest>) -> Json<Value> {
    envelope::respond(book_inner(ctx, req).await)
}

async fn book_inner(ctx: AppContext, req: BookingRequest) -> ClinicResult<Json<Value>> {
    let (Some(name), Some(email), Some(phone), Some(doctor), Some(raw_date)) = (
        req.name,
        req.email,
        req.number,
        req.doctor,
        req.appointment_date,
    ) else {
        return Err(ClinicError::Validation(
            "All fields are required".to_string(),
        ));
    };

    let date = parse_appointment_date(&raw_date).ok_or_else(|| {
        ClinicError::Validation("Invalid appointment date format".to_string())
    })?;

    let appt = ctx
        .appointments
        .book(&name, &email, &phone, &doctor, date)
        .await?;

    if let Err(e) = ctx
        .mailer
        .send_appointment_confirmation(
            &appt.email,
            &appt.name,
            &appt.doctor,
            &appt.appointment_date,
            &appt.phone,
        )
        .await
    {
        tracing::warn!("Confirmation mail to {} failed: {}", appt.email, e);
    }

    Ok(envelope::success(
        "Appointment booked successfully! Confirmation email sent.",
    ))
}

#[derive(Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

async fn my_appointments(
    State(ctx): State<AppContext>,
    Query(query): Query<EmailQuery>,
) -> Json<Value> {
    envelope::respond(my_appointments_inner(ctx, query).await)
}

async fn my_appointments_inner(ctx: AppContext, query: EmailQuery) -> ClinicResult<Json<Value>> {
    let email = query
        .email
        .ok_or_else(|| ClinicError::Validation("Email required".to_string()))?;

    let appointments = ctx.appointments.list_for_email(&email).await?;
    Ok(Json(json!({
        "status": "success",
        "appointments": appointments
    })))
}

#[derive(Deserialize)]
struct UpdateRequest {
    id: Option<i64>,
    status: Option<String>,
    date: Option<String>,
    doctor: Option<String>,
}

async fn update_appointment(
    State(ctx): State<AppContext>,
    Json(req): Json<UpdateRequest>,
) -> Json<Value> {
    envelope::respond(update_appointment_inner(ctx, req).await)
}

async fn update_appointment_inner(ctx: AppContext, req: UpdateRequest) -> ClinicResult<Json<Value>> {
    let id = req
        .id
        .ok_or_else(|| ClinicError::Validation("ID required".to_string()))?;

    let appt = ctx
        .appointments
        .update(
            id,
            AppointmentUpdate {
                status: req.status,
                date: req.date,
                doctor: req.doctor,
            },
        )
        .await?;

    // Rescheduled and Completed notify the patient; the queue keeps the
    // mail transport off this request's latency path.
    if appt.status.notifies_patient() {
        ctx.notifier.enqueue(Notification::StatusChange {
            status: appt.status,
            name: appt.name.clone(),
            email: appt.email.clone(),
            doctor: appt.doctor.clone(),
            date: appt.appointment_date,
            phone: appt.phone.clone(),
        });
    }

    Ok(Json(json!({
        "status": "success",
        "message": "Appointment updated successfully",
        "updated_data": {
            "status": appt.status.as_str(),
            "doctor": appt.doctor,
            "date": appt.appointment_date.to_rfc3339()
        }
    })))
}
