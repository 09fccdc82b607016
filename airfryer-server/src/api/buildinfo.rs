//! Build and instance information
//!
//! Lets the page (or an operator) see which build is running and which recipe
//! document it serves.

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::{AppState, MODULE_NAME};

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub module: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    /// Recipe document on disk, as resolved at startup
    pub data_file: String,
}

/// GET /api/buildinfo
pub async fn get_build_info(State(state): State<AppState>) -> Json<BuildInfo> {
    Json(BuildInfo {
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        build_profile: env!("BUILD_PROFILE"),
        data_file: state.data_file.display().to_string(),
    })
}
