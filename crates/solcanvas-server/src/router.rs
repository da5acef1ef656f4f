//! Router assembly for the solcanvas HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax.
/// CORS is permissive (the editor front end may be served from anywhere).
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Projects
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route("/projects/{id}", delete(handlers::projects::delete_project))
        .route(
            "/projects/{id}/contracts",
            post(handlers::projects::add_contract),
        )
        .route(
            "/projects/{id}/contracts/{name}/open",
            post(handlers::projects::open_contract),
        )
        // Palette
        .route("/templates", get(handlers::palette::list_templates))
        .route("/forms/{kind}", get(handlers::palette::get_form))
        // Editor session
        .route("/editor", get(handlers::editor::summary))
        .route("/editor/render", post(handlers::editor::render))
        .route("/editor/layout", post(handlers::editor::apply_layout))
        .route("/editor/save", post(handlers::editor::save))
        .route("/editor/export", post(handlers::editor::export))
        // Drag protocol
        .route("/editor/drag/start", post(handlers::drag::start))
        .route("/editor/drag/move", post(handlers::drag::move_to))
        .route("/editor/drag/end", post(handlers::drag::end))
        .route("/editor/drag/cancel", post(handlers::drag::cancel))
        // Nodes and connections
        .route(
            "/editor/nodes/{id}",
            put(handlers::nodes::update_node).delete(handlers::nodes::delete_node),
        )
        .route(
            "/editor/connections",
            post(handlers::nodes::connect).delete(handlers::nodes::disconnect),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
