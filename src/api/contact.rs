/// Contact form handler
use super::envelope::{self, invalid_method};
use crate::{
    context::AppContext,
    error::{ClinicError, ClinicResult},
};
use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use serde_json::Value;

pub fn routes() -> Router<AppContext> {
    Router::new().route("/contact", post(contact).fallback(invalid_method))
}

#[derive(Deserialize)]
struct ContactRequest {
    #[serde(rename = "contactName")]
    name: Option<String>,
    #[serde(rename = "contactEmail")]
    email: Option<String>,
    #[serde(rename = "contactNumber")]
    phone: Option<String>,
    #[serde(rename = "contactMessage")]
    message: Option<String>,
}

async fn contact(State(ctx): State<AppContext>, Json(req): Json<ContactRequest>) -> Json<Value> {
    envelope::respond(contact_inner(ctx, req).await)
}

async fn contact_inner(ctx: AppContext, req: ContactRequest) -> ClinicResult<Json<Value>> {
    let (Some(name), Some(email), Some(phone), Some(message)) =
        (req.name, req.email, req.phone, req.message)
    else {
        return Err(ClinicError::Validation(
            "All fields are required".to_string(),
        ));
    };

    ctx.contacts.create(&name, &email, &phone, &message).await?;

    if let Err(e) = ctx
        .mailer
        .send_contact_mails(&name, &email, &phone, &message)
        .await
    {
        tracing::warn!("Contact mails for {} failed: {}", email, e);
    }

    Ok(envelope::success(
        "Message sent! We checked your inbox for offers.",
    ))
}
