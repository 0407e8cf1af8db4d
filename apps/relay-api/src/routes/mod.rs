pub mod health;
pub mod landing;

use axum::Router;
use utoipa::OpenApi;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(landing::router())
        .merge(crate::gateway::server::router())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        landing::landing,
        crate::gateway::server::ws_upgrade,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Relay", description = "Chat page and WebSocket relay"),
    )
)]
pub struct ApiDoc;
