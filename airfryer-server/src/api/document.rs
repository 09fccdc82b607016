//! Persisted recipe document endpoint
//!
//! `GET /data/data.json` is served straight from disk by the router.
//! `PUT /data/data.json` replaces the whole document in one write.

use airfryer_common::Collection;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;

/// PUT /data/data.json
///
/// Validates the body as a recipe document, replaces the session state with
/// it and persists it. Responds `{"status": "success"}` or
/// `{"status": "error"}`.
pub async fn put_document(State(state): State<AppState>, body: String) -> Response {
    let collection: Collection = match serde_json::from_str(&body) {
        Ok(collection) => collection,
        Err(e) => {
            warn!("Rejected recipe document: {}", e);
            return status_response(StatusCode::BAD_REQUEST, "error");
        }
    };

    let recipe_count = collection.recipe_count();
    let mut controller = state.controller.lock().await;
    match controller.replace_document(collection).await {
        Ok(()) => {
            info!("Recipe document updated ({} recipes)", recipe_count);
            status_response(StatusCode::OK, "success")
        }
        Err(e) => {
            error!("Failed to store recipe document: {}", e);
            status_response(StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    }
}

fn status_response(status: StatusCode, outcome: &str) -> Response {
    (status, Json(json!({ "status": outcome }))).into_response()
}
