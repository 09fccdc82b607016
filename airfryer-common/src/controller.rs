//! Interaction controller
//!
//! Translates user actions into one store operation each, then persists the
//! whole collection and re-renders. Persistence failures are reported but
//! never rolled back: the in-memory store stays optimistically updated and
//! may diverge from the persisted document until the next successful save.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::gateway::StorageGateway;
use crate::models::{Collection, InlineField, Recipe, RecipeAddress};
use crate::render::{render, render_search, DisplayTree};
use crate::store::RecipeStore;
use crate::{Error, Result};

/// File name offered for exported collections
pub const EXPORT_FILENAME: &str = "airfryer_recipes.json";

/// User actions, dispatched through [`Controller::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Filter the view by recipe name. Never persists.
    Search {
        #[serde(default)]
        query: String,
    },
    /// Form submit: add under `category`, or replace the recipe at `target`
    ///
    /// `category` is ignored when editing; recipes never change category.
    Submit {
        #[serde(default)]
        target: Option<RecipeAddress>,
        #[serde(default)]
        category: String,
        recipe: Recipe,
    },
    /// Inline edit of one detail field; persisted without re-rendering
    EditField {
        address: RecipeAddress,
        field: InlineField,
        value: String,
    },
    Duplicate {
        address: RecipeAddress,
    },
    /// Only executed once the user has confirmed
    Delete {
        address: RecipeAddress,
        #[serde(default)]
        confirmed: bool,
    },
    /// Raw text of a user-selected JSON file
    Import {
        payload: String,
    },
    /// Discard in-memory state in favor of the persisted document
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            code: None,
            message: message.into(),
        }
    }

    pub fn from_error(error: &Error) -> Self {
        Self {
            level: NoticeLevel::Error,
            code: Some(error.code().to_string()),
            message: error.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Result of one dispatched action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Fresh view to display; `None` means the display stays as it is
    pub view: Option<DisplayTree>,
    /// Category names for the editor's category picker
    pub categories: Vec<String>,
    pub notice: Option<Notice>,
    /// Whether an open edit surface should be closed
    pub close_editor: bool,
}

impl Outcome {
    /// Nothing happened; keep the current display
    pub fn unchanged(categories: Vec<String>) -> Self {
        Self {
            view: None,
            categories,
            notice: None,
            close_editor: false,
        }
    }
}

/// Downloadable snapshot of the in-memory collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub body: String,
}

/// Owns the session state and sequences mutate, persist, render
pub struct Controller<G> {
    store: RecipeStore,
    gateway: G,
}

impl<G: StorageGateway> Controller<G> {
    /// Controller with an empty store; call [`Controller::reload`] to load
    pub fn new(gateway: G) -> Self {
        Self::with_store(gateway, RecipeStore::default())
    }

    pub fn with_store(gateway: G, store: RecipeStore) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replace in-memory state with the persisted document
    ///
    /// On failure the current in-memory state is left untouched.
    pub async fn reload(&mut self) -> Result<()> {
        let collection = self.gateway.load().await?;
        info!(
            "Loaded {} recipes in {} categories",
            collection.recipe_count(),
            collection.categories.len()
        );
        self.store.replace(collection);
        Ok(())
    }

    /// Current view, filtered by `query` when it is non-empty
    pub fn view(&self, query: &str) -> Outcome {
        let view = if query.is_empty() {
            render(self.store.collection())
        } else {
            render_search(self.store.collection(), query)
        };

        Outcome {
            view: Some(view),
            categories: self.store.category_names(),
            notice: None,
            close_editor: false,
        }
    }

    /// Run one action through its store operation, persist and re-render
    pub async fn dispatch(&mut self, action: Action) -> Outcome {
        match action {
            Action::Search { query } => self.view(&query),

            Action::Submit {
                target,
                category,
                recipe,
            } => {
                if let Err(e) = validate_submission(target, &category, &recipe) {
                    return self.reject(e);
                }
                let result = match target {
                    Some(address) => self.store.update(address, recipe),
                    None => {
                        self.store.add(category.trim(), recipe);
                        Ok(())
                    }
                };
                self.apply(result, true).await
            }

            Action::EditField {
                address,
                field,
                value,
            } => {
                // The edited span already shows the value; re-rendering would
                // collapse the open detail row
                match self
                    .store
                    .update_field(address, field, value.trim().to_string())
                {
                    Ok(()) => Outcome {
                        notice: self.persist().await,
                        ..Outcome::unchanged(self.store.category_names())
                    },
                    Err(e) => self.reject(e),
                }
            }

            Action::Duplicate { address } => {
                let result = self.store.duplicate(address).map(|_| ());
                self.apply(result, false).await
            }

            Action::Delete { address, confirmed } => {
                if !confirmed {
                    info!(
                        "Delete of recipe {}/{} not confirmed",
                        address.category, address.item
                    );
                    return Outcome::unchanged(self.store.category_names());
                }
                let result = self.store.remove(address).map(|removed| {
                    info!("Deleted recipe '{}'", removed.name);
                });
                self.apply(result, false).await
            }

            Action::Import { payload } => match parse_import(&payload) {
                Ok(collection) => {
                    info!("Importing {} recipes", collection.recipe_count());
                    self.store.replace(collection);
                    let mut outcome = self.persist_and_render(false).await;
                    if outcome.notice.is_none() {
                        outcome.notice = Some(Notice::info("Recipes imported successfully"));
                    }
                    outcome
                }
                Err(e) => self.reject(e),
            },

            Action::Reload => {
                let result = self.reload().await;
                let mut outcome = self.view("");
                if let Err(e) = result {
                    outcome.notice = Some(Notice::from_error(&e));
                }
                outcome
            }
        }
    }

    /// Replace the whole collection and persist it (full-document write)
    ///
    /// The replacement stays in memory even if the save fails.
    pub async fn replace_document(&mut self, mut collection: Collection) -> Result<()> {
        collection.drop_empty_categories();
        self.store.replace(collection);
        self.gateway.save(self.store.collection()).await
    }

    /// Snapshot of in-memory state, independent of what has been persisted
    pub fn export(&self) -> Result<ExportFile> {
        let body = self
            .store
            .collection()
            .to_pretty_json()
            .map_err(|e| Error::Internal(e.to_string()))?;
        Ok(ExportFile {
            filename: EXPORT_FILENAME,
            body,
        })
    }

    async fn apply(&mut self, result: Result<()>, close_editor: bool) -> Outcome {
        match result {
            Ok(()) => self.persist_and_render(close_editor).await,
            Err(e) => self.reject(e),
        }
    }

    /// Save the whole collection; a failure becomes an error notice
    async fn persist(&self) -> Option<Notice> {
        match self.gateway.save(self.store.collection()).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Changes kept in memory only: {}", e);
                Some(Notice::from_error(&e))
            }
        }
    }

    async fn persist_and_render(&mut self, close_editor: bool) -> Outcome {
        let notice = self.persist().await;

        Outcome {
            view: Some(render(self.store.collection())),
            categories: self.store.category_names(),
            notice,
            close_editor,
        }
    }

    fn reject(&self, error: Error) -> Outcome {
        warn!("Action rejected: {}", error);
        Outcome {
            notice: Some(Notice::from_error(&error)),
            ..Outcome::unchanged(self.store.category_names())
        }
    }
}

fn validate_submission(
    target: Option<RecipeAddress>,
    category: &str,
    recipe: &Recipe,
) -> Result<()> {
    if recipe.name.trim().is_empty() {
        return Err(Error::InvalidInput("recipe name is required".to_string()));
    }
    if target.is_none() && category.trim().is_empty() {
        return Err(Error::InvalidInput("category is required".to_string()));
    }
    Ok(())
}

/// Parse a user-supplied import file
///
/// # Errors
/// `Error::ImportParse` if the text is not JSON, `Error::ImportFormat` if it
/// has no `recipes` list. Categories without recipes are dropped.
pub fn parse_import(payload: &str) -> Result<Collection> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(Error::ImportParse)?;

    if value.get("recipes").is_none() {
        return Err(Error::ImportFormat("missing \"recipes\" field".to_string()));
    }

    let mut collection: Collection =
        serde_json::from_value(value).map_err(|e| Error::ImportFormat(e.to_string()))?;
    collection.drop_empty_categories();

    Ok(collection)
}
