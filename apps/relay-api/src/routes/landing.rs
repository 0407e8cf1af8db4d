//! Browser chat page served at `/`.

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::AppState;

const LANDING_PAGE: &str = include_str!("../../static/index.html");

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(landing))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Relay",
    responses(
        (status = 200, description = "Chat page", body = String, content_type = "text/html"),
    ),
)]
pub async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}
