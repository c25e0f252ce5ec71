use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use configs::UploadsConfig;

use crate::{openapi::ApiDoc, state::ServerState};

pub mod incidents;
pub mod uploads;
pub mod users;

/// JSON request bodies are capped at 10 MiB.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;
/// Room for multipart boundaries and part headers around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub async fn root() -> &'static str {
    "Incident API is up and running"
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Store connectivity", body = crate::openapi::HealthResponse))
)]
pub async fn health(State(state): State<ServerState>) -> Json<Health> {
    Json(Health::from_connected(state.probe.is_connected().await))
}

/// Build the full application router: API routes, uploaded files and API docs
pub fn build_router(state: ServerState, cors: CorsLayer, uploads: &UploadsConfig) -> Router {
    let upload_limit = uploads.max_bytes.saturating_add(MULTIPART_OVERHEAD);

    let api = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/incidents", get(incidents::list).post(incidents::create))
        .route("/incidents/:id", patch(incidents::update))
        .route("/users/sync", post(users::sync))
        .route("/users/by-firebase-id/:firebase_id", get(users::get_by_firebase_id))
        .route("/users/:id/promote", patch(users::promote))
        .route(
            "/upload",
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state);

    api.nest_service("/uploads", ServeDir::new(&uploads.dir))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request carrying method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
