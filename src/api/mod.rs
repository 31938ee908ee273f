/// API routes and handlers
pub mod admin;
pub mod appointments;
pub mod auth;
pub mod contact;
pub mod envelope;
pub mod pages;
pub mod ratings;
pub mod reports;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(pages::routes())
        .merge(auth::routes())
        .merge(appointments::routes())
        .merge(contact::routes())
        .merge(admin::routes())
        .merge(ratings::routes())
        .merge(reports::routes())
}
