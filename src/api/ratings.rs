/// Doctor rating handlers
use super::envelope::{self, invalid_method};
use crate::{
    context::AppContext,
    error::{ClinicError, ClinicResult},
};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/api/submit-rating/",
            post(submit_rating).fallback(invalid_method),
        )
        .route("/api/get-ratings/", get(get_ratings))
        .route(
            "/api/update-rating/",
            post(update_rating).fallback(invalid_method),
        )
        .route(
            "/api/delete-rating/",
            post(delete_rating).fallback(invalid_method),
        )
}

/// Clients send the score as either a number or a numeric string.
fn coerce_score(value: &Value) -> ClinicResult<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ClinicError::Validation("Invalid rating value".to_string())),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| ClinicError::Validation("Invalid rating value".to_string())),
        _ => Err(ClinicError::Validation("Invalid rating value".to_string())),
    }
}

#[derive(Deserialize)]
struct SubmitRequest {
    doctor_name: Option<String>,
    user_email: Option<String>,
    user_name: Option<String>,
    rating: Option<Value>,
    review_text: Option<String>,
}

async fn submit_rating(
    State(ctx): State<AppContext>,
    Json(req): Json<SubmitRequest>,
) -> Json<Value> {
    envelope::respond(submit_rating_inner(ctx, req).await)
}

async fn submit_rating_inner(ctx: AppContext, req: SubmitRequest) -> ClinicResult<Json<Value>> {
    let (Some(doctor_name), Some(user_email), Some(user_name), Some(rating), Some(review_text)) = (
        req.doctor_name,
        req.user_email,
        req.user_name,
        req.rating,
        req.review_text,
    ) else {
        return Err(ClinicError::Validation(
            "All fields are required".to_string(),
        ));
    };

    let score = coerce_score(&rating)?;
    ctx.ratings
        .submit(&doctor_name, &user_email, &user_name, score, &review_text)
        .await?;

    Ok(envelope::success("Rating submitted successfully!"))
}

async fn get_ratings(State(ctx): State<AppContext>) -> Json<Value> {
    envelope::respond(get_ratings_inner(ctx).await)
}

async fn get_ratings_inner(ctx: AppContext) -> ClinicResult<Json<Value>> {
    let ratings = ctx.ratings.list_all().await?;
    Ok(Json(json!({"status": "success", "ratings": ratings})))
}

#[derive(Deserialize)]
struct UpdateRequest {
    rating_id: Option<i64>,
    user_email: Option<String>,
    rating: Option<Value>,
    review_text: Option<String>,
}

async fn update_rating(
    State(ctx): State<AppContext>,
    Json(req): Json<UpdateRequest>,
) -> Json<Value> {
    envelope::respond(update_rating_inner(ctx, req).await)
}

async fn update_rating_inner(ctx: AppContext, req: UpdateRequest) -> ClinicResult<Json<Value>> {
    let (Some(rating_id), Some(user_email), Some(rating), Some(review_text)) =
        (req.rating_id, req.user_email, req.rating, req.review_text)
    else {
        return Err(ClinicError::Validation(
            "All fields are required".to_string(),
        ));
    };

    let score = coerce_score(&rating)?;
    ctx.ratings
        .update(rating_id, &user_email, score, &review_text)
        .await?;

    Ok(envelope::success("Rating updated successfully!"))
}

#[derive(Deserialize)]
struct DeleteRequest {
    rating_id: Option<i64>,
    user_email: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

async fn delete_rating(
    State(ctx): State<AppContext>,
    Json(req): Json<DeleteRequest>,
) -> Json<Value> {
    envelope::respond(delete_rating_inner(ctx, req).await)
}

async fn delete_rating_inner(ctx: AppContext, req: DeleteRequest) -> ClinicResult<Json<Value>> {
    let rating_id = req
        .rating_id
        .ok_or_else(|| ClinicError::Validation("Rating ID required".to_string()))?;

    ctx.ratings
        .delete(rating_id, req.user_email.as_deref(), req.is_admin)
        .await?;

    Ok(envelope::success("Rating deleted successfully!"))
}
