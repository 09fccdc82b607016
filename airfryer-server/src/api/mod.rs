//! HTTP API handlers for airfryer-server

pub mod buildinfo;
pub mod document;
pub mod health;
pub mod recipes;
pub mod ui;

pub use buildinfo::get_build_info;
pub use document::put_document;
pub use health::health_routes;
pub use recipes::{dispatch_action, export_recipes, get_recipe, get_view};
pub use ui::{serve_app_js, serve_index};
