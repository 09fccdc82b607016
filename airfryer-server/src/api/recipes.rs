//! Recipe view and action endpoints
//!
//! The page posts every user action here; the controller mutates the store,
//! persists and answers with the freshly rendered view.

use airfryer_common::{Action, Outcome, Recipe, RecipeAddress};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Query parameters for the current view
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Recipe name filter (empty shows everything)
    #[serde(default)]
    pub q: String,
}

/// Controller outcome plus the markup to swap into the page
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Rendered view; absent when the display should stay as it is
    pub html: Option<String>,
}

impl From<Outcome> for ViewResponse {
    fn from(outcome: Outcome) -> Self {
        let html = outcome.view.as_ref().map(|view| view.to_html());
        Self { outcome, html }
    }
}

/// GET /api/view?q=
///
/// Renders the current in-memory state, optionally filtered by name.
pub async fn get_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<ViewResponse> {
    let controller = state.controller.lock().await;
    Json(controller.view(&query.q).into())
}

/// POST /api/actions
///
/// Dispatches one user action. Failures are reported through the `notice`
/// field, so the response is 200 whenever the action could be decoded.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(action): Json<Action>,
) -> Json<ViewResponse> {
    debug!("Dispatching {:?}", action);
    let mut controller = state.controller.lock().await;
    Json(controller.dispatch(action).await.into())
}

/// GET /api/recipes/:category/:item
///
/// One recipe, used to prefill the edit form.
pub async fn get_recipe(
    State(state): State<AppState>,
    Path((category, item)): Path<(usize, usize)>,
) -> ApiResult<Json<Recipe>> {
    let controller = state.controller.lock().await;
    controller
        .store()
        .get(RecipeAddress::new(category, item))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("recipe {}/{}", category, item)))
}

/// GET /api/export
///
/// Downloads the in-memory collection as `airfryer_recipes.json`.
pub async fn export_recipes(State(state): State<AppState>) -> ApiResult<Response> {
    let export = state.controller.lock().await.export()?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export.filename
    ))
    .map_err(|e| ApiError::Common(airfryer_common::Error::Internal(e.to_string())))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}
