//! airfryer-server library - HTTP surface for the recipe manager
//!
//! Serves the single-page UI, the persisted recipe document and the
//! controller action endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use airfryer_common::{Controller, FileGateway};
use axum::{
    http::{header, Method},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Module name reported by the health endpoint
pub const MODULE_NAME: &str = "airfryer-server";

/// URL path of the persisted recipe document
pub const DOCUMENT_PATH: &str = "/data/data.json";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Session state; one action at a time, including its save
    pub controller: Arc<Mutex<Controller<FileGateway>>>,
    /// File served at [`DOCUMENT_PATH`]
    pub data_file: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(controller: Controller<FileGateway>) -> Self {
        let data_file = controller.gateway().path().to_path_buf();
        Self {
            controller: Arc::new(Mutex::new(controller)),
            data_file,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, get_service, post};

    // Document endpoint is readable and writable cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let document = get_service(ServeFile::new(&state.data_file)).put(api::put_document);

    let api = Router::new()
        .route("/api/view", get(api::get_view))
        .route("/api/actions", post(api::dispatch_action))
        .route("/api/recipes/:category/:item", get(api::get_recipe))
        .route("/api/export", get(api::export_recipes))
        .route("/api/buildinfo", get(api::get_build_info));

    let ui = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js));

    Router::new()
        .route(DOCUMENT_PATH, document)
        .merge(api)
        .merge(ui)
        .merge(api::health_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
