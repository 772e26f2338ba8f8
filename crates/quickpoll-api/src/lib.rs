pub mod error;
pub mod middleware;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use quickpoll_core::AppState;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/polls",
            get(routes::polls::get_poll)
                .post(routes::polls::create_poll)
                .put(routes::polls::cast_vote),
        )
        .route("/api/polls/vote", post(routes::polls::cast_vote))
        .route("/api/polls/results", get(routes::polls::get_results))
        .route("/api/polls/admin", get(routes::admin::list_polls))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
