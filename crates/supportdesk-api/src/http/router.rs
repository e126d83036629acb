//! Axum router configuration with middleware.
//!
//! JSON routes live under `/api/`; `/` serves the chat page from the
//! configured web directory (404 when it has no `index.html`).
//! Middleware: CORS (any origin), request tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/tickets", get(handlers::tickets::list_tickets))
        .route("/memories/{user_id}", get(handlers::memories::get_memories))
        .route("/session/{user_id}", delete(handlers::session::new_session))
        .route("/health", get(handlers::health::health));

    let index = state.web_dir().join("index.html");
    tracing::debug!(path = %index.display(), "chat page location");

    Router::new()
        .route_service("/", ServeFile::new(index))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
