/// Static landing page
use crate::context::AppContext;
use axum::{response::Html, routing::get, Router};

pub fn routes() -> Router<AppContext> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
