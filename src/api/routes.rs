//! API route definitions

use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create the API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/askquestion", post(handlers::ask_question))
        .with_state(state)
}
