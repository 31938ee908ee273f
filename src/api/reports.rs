/// Treatment report handlers and PDF export
use super::envelope::{self, invalid_method};
use crate::{
    context::AppContext,
    error::{ClinicError, ClinicResult},
    reports::{pdf, ReportInput},
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/manage-report",
            post(manage_report).fallback(invalid_method),
        )
        .route("/api/get-all-reports", get(get_all_reports))
        .route("/api/get-user-reports", get(get_user_reports))
        .route("/download-report/:id/", get(download_report))
        .route("/download-report/:id", get(download_report))
}

#[derive(Deserialize)]
struct ActionParams {
    action: Option<String>,
}

#[derive(Deserialize)]
struct DeleteById {
    id: Option<i64>,
}

async fn manage_report(
    State(ctx): State<AppContext>,
    Query(params): Query<ActionParams>,
    Json(body): Json<Value>,
) -> Json<Value> {
    envelope::respond(manage_report_inner(ctx, params, body).await)
}

async fn manage_report_inner(
    ctx: AppContext,
    params: ActionParams,
    body: Value,
) -> ClinicResult<Json<Value>> {
    if params.action.as_deref() == Some("delete") {
        let req: DeleteById = serde_json::from_value(body)
            .map_err(|e| ClinicError::Validation(format!("Invalid JSON body: {}", e)))?;
        let id = req
            .id
            .ok_or_else(|| ClinicError::Validation("ID required".to_string()))?;

        ctx.reports.delete(id).await?;
        return Ok(envelope::success("Report deleted"));
    }

    let input: ReportInput = serde_json::from_value(body)
        .map_err(|e| ClinicError::Validation(format!("Invalid JSON body: {}", e)))?;
    let updating = input.id.is_some();

    ctx.reports.upsert(input).await?;
    Ok(envelope::success(if updating {
        "Report updated successfully"
    } else {
        "Report created successfully"
    }))
}

async fn get_all_reports(State(ctx): State<AppContext>) -> Json<Value> {
    envelope::respond(get_all_reports_inner(ctx).await)
}

async fn get_all_reports_inner(ctx: AppContext) -> ClinicResult<Json<Value>> {
    let reports = ctx.reports.list_all().await?;
    Ok(Json(json!({"status": "success", "reports": reports})))
}

#[derive(Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

async fn get_user_reports(
    State(ctx): State<AppContext>,
    Query(query): Query<EmailQuery>,
) -> Json<Value> {
    envelope::respond(get_user_reports_inner(ctx, query).await)
}

async fn get_user_reports_inner(ctx: AppContext, query: EmailQuery) -> ClinicResult<Json<Value>> {
    let email = query
        .email
        .ok_or_else(|| ClinicError::Validation("Email required".to_string()))?;

    let reports = ctx.reports.list_for_user(&email).await?;
    Ok(Json(json!({"status": "success", "reports": reports})))
}

/// The one non-envelope route: streams the rendered PDF, or answers with
/// plain-text 404/500 through the error's own response mapping.
async fn download_report(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> ClinicResult<Response> {
    let report = ctx
        .reports
        .get_with_user(id)
        .await
        .map_err(|e| match e {
            ClinicError::NotFound(_) => ClinicError::NotFound("Report not found".to_string()),
            other => other,
        })?;

    let bytes = pdf::render_report(&report)?;
    let filename = pdf::attachment_filename(&report);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
