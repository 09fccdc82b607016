//! # Airfryer Recipe Manager Common Library
//!
//! Everything except the HTTP surface:
//! - Recipe collection data model
//! - In-memory recipe store (CRUD and search)
//! - View rendering
//! - Storage gateways (file and HTTP)
//! - Interaction controller
//! - Configuration loading

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod models;
pub mod render;
pub mod store;

pub use controller::{Action, Controller, ExportFile, Notice, Outcome};
pub use error::{Error, Result};
pub use gateway::{FileGateway, HttpGateway, StorageGateway};
pub use models::{Category, Collection, InlineField, Recipe, RecipeAddress};
pub use render::{render, render_search, DisplayTree};
pub use store::RecipeStore;
