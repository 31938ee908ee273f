/// Admin dashboard and management handlers
use super::envelope::{self, invalid_method};
use crate::{
    context::AppContext,
    error::{ClinicError, ClinicResult},
    uploads,
};
use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/admin-dashboard-data", get(dashboard_data))
        .route(
            "/api/manage-doctor",
            post(manage_doctor).fallback(invalid_method),
        )
        .route(
            "/api/update-admin-credentials",
            post(update_credentials).fallback(invalid_method),
        )
        .route("/api/get-doctors", get(get_doctors))
        .route("/api/get-all-doctors", get(get_all_doctors))
        .route("/api/get-all-users", get(get_all_users))
}

async fn dashboard_data(State(ctx): State<AppContext>) -> Json<Value> {
    envelope::respond(dashboard_data_inner(ctx).await)
}

async fn dashboard_data_inner(ctx: AppContext) -> ClinicResult<Json<Value>> {
    let users_count = ctx.users.count().await?;
    let appointments_count = ctx.appointments.count().await?;
    let doctors_count = ctx.doctors.count().await?;

    let users: Vec<Value> = ctx
        .users
        .list_all()
        .await?
        .into_iter()
        .map(|u| {
            json!({
                "name": u.name,
                "email": u.email,
                "age": u.age,
                "gender": u.gender,
                "blood_type": u.blood_type,
                "profile_pic": u.profile_pic
            })
        })
        .collect();

    let appointments = ctx.appointments.list_all().await?;

    let doctors: Vec<Value> = ctx
        .doctors
        .list_all()
        .await?
        .into_iter()
        .map(|d| json!({"id": d.id, "name": d.name, "specialization": d.specialization}))
        .collect();

    Ok(Json(json!({
        "status": "success",
        "stats": {
            "users": users_count,
            "appointments": appointments_count,
            "doctors": doctors_count
        },
        "users": users,
        "appointments": appointments,
        "doctors": doctors
    })))
}

#[derive(Deserialize)]
struct ActionParams {
    action: Option<String>,
}

#[derive(Deserialize)]
struct DeleteById {
    id: Option<i64>,
}

/// Add (multipart form) or, with `?action=delete`, remove (JSON body) a
/// doctor. The two payload shapes force manual extraction from the raw
/// request.
async fn manage_doctor(
    State(ctx): State<AppContext>,
    Query(params): Query<ActionParams>,
    request: Request,
) -> Json<Value> {
    envelope::respond(manage_doctor_inner(ctx, params, request).await)
}

async fn manage_doctor_inner(
    ctx: AppContext,
    params: ActionParams,
    request: Request,
) -> ClinicResult<Json<Value>> {
    if params.action.as_deref() == Some("delete") {
        let Json(body): Json<DeleteById> = Json::from_request(request, &())
            .await
            .map_err(|e| ClinicError::Validation(format!("Invalid JSON body: {}", e)))?;
        let id = body
            .id
            .ok_or_else(|| ClinicError::Validation("ID required".to_string()))?;

        ctx.doctors.delete(id).await?;
        return Ok(envelope::success("Doctor removed"));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ClinicError::Validation(format!("Malformed form data: {}", e)))?;

    let mut name = None;
    let mut specialization = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ClinicError::Validation(format!("Malformed form data: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "name" => {
                name = field.text().await.ok().filter(|v| !v.trim().is_empty());
            }
            "specialization" => {
                specialization = field.text().await.ok().filter(|v| !v.trim().is_empty());
            }
            "image" => {
                let filename = field.file_name().unwrap_or("doctor.png").to_string();
                if let Ok(bytes) = field.bytes().await {
                    if !bytes.is_empty() {
                        image = Some(
                            uploads::save_upload(&ctx.config.uploads.directory, &filename, &bytes)
                                .await?,
                        );
                    }
                }
            }
            _ => {}
        }
    }

    let (Some(name), Some(specialization)) = (name, specialization) else {
        return Err(ClinicError::Validation(
            "Name and Specialization required".to_string(),
        ));
    };

    ctx.doctors.add(&name, &specialization, image).await?;
    Ok(envelope::success("Doctor added successfully"))
}

#[derive(Deserialize)]
struct CredentialsRequest {
    username: Option<String>,
    password: Option<String>,
    current_username: Option<String>,
}

async fn update_credentials(
    State(ctx): State<AppContext>,
    Json(req): Json<CredentialsRequest>,
) -> Json<Value> {
    envelope::respond(update_credentials_inner(ctx, req).await)
}

async fn update_credentials_inner(
    ctx: AppContext,
    req: CredentialsRequest,
) -> ClinicResult<Json<Value>> {
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ClinicError::Validation(
            "Username and Password required".to_string(),
        ));
    };

    ctx.admins
        .update_credentials(&username, &password, req.current_username.as_deref())
        .await?;

    Ok(envelope::success("Credentials updated. Please login again."))
}

async fn get_doctors(State(ctx): State<AppContext>) -> Json<Value> {
    envelope::respond(get_doctors_inner(ctx).await)
}

async fn get_doctors_inner(ctx: AppContext) -> ClinicResult<Json<Value>> {
    let doctors: Vec<Value> = ctx
        .doctors
        .list_all()
        .await?
        .into_iter()
        .map(|d| json!({"id": d.id, "name": d.name, "specialization": d.specialization}))
        .collect();
    Ok(Json(json!({"status": "success", "doctors": doctors})))
}

async fn get_all_doctors(State(ctx): State<AppContext>) -> Json<Value> {
    envelope::respond(get_all_doctors_inner(ctx).await)
}

async fn get_all_doctors_inner(ctx: AppContext) -> ClinicResult<Json<Value>> {
    let doctors: Vec<Value> = ctx
        .doctors
        .list_all()
        .await?
        .into_iter()
        .map(|d| json!({"name": d.name}))
        .collect();
    Ok(Json(json!({"status": "success", "doctors": doctors})))
}

async fn get_all_users(State(ctx): State<AppContext>) -> Json<Value> {
    envelope::respond(get_all_users_inner(ctx).await)
}

async fn get_all_users_inner(ctx: AppContext) -> ClinicResult<Json<Value>> {
    let users: Vec<Value> = ctx
        .users
        .list_all()
        .await?
        .into_iter()
        .map(|u| json!({"email": u.email, "name": u.name}))
        .collect();
    Ok(Json(json!({"status": "success", "users": users})))
}
