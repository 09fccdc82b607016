//! Common error types for the recipe manager

use thiserror::Error;

use crate::models::RecipeAddress;

/// Common result type for recipe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the store, gateways and controller
///
/// `Load`, `Save`, `ImportFormat` and `ImportParse` are the user-facing
/// failures: each ends the operation that raised it and is reported as a
/// notification, never retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Retrieval or parse failure of the persisted document
    #[error("Failed to load recipes: {0}")]
    Load(String),

    /// Write rejected or transport failure
    #[error("Failed to save changes: {0}")]
    Save(String),

    /// User-supplied import file lacks the `recipes` root field
    #[error("Invalid file format: {0}")]
    ImportFormat(String),

    /// User-supplied import file is not valid JSON
    #[error("Failed to read import file: {0}")]
    ImportParse(#[source] serde_json::Error),

    /// Positional address does not exist (stale or out of range)
    #[error("No recipe at category {}, item {}", .0.category, .0.item)]
    InvalidAddress(RecipeAddress),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short machine-readable code used in API responses and notices
    pub fn code(&self) -> &'static str {
        match self {
            Error::Load(_) => "LOAD_ERROR",
            Error::Save(_) => "SAVE_ERROR",
            Error::ImportFormat(_) => "IMPORT_FORMAT_ERROR",
            Error::ImportParse(_) => "IMPORT_PARSE_ERROR",
            Error::InvalidAddress(_) => "INVALID_ADDRESS",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}
