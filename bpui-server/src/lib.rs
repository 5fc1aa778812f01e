//! bpui-server library - backup plan admin UI
//!
//! Routes map one-to-one onto [`DataSource`] operations and render HTML
//! fragments for htmx.

use std::sync::Arc;

use axum::Router;
use bpui_common::DataSource;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod validate;
pub mod views;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Storage backend holding the backup plan
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    /// Create new application state
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, put};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/entries", get(api::list_entries))
        .route("/actions/edit/:id", get(api::edit_entry))
        .route("/actions/submit/:id", put(api::submit_edits))
        .route("/actions/cancel/:id", get(api::cancel_edit))
        .route("/actions/startDelete/:id", get(api::start_delete))
        .route("/actions/delete/:id", get(api::delete_entry))
        .route("/actions/cancelDel", get(api::cancel_delete))
        .route("/actions/add", get(api::show_add_form).put(api::add_entry))
        .route("/static/style.css", get(api::serve_style_css))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
