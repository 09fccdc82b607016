//! Storage gateways for the persisted recipe document
//!
//! Every read and write moves the whole collection. There are no partial or
//! field-level writes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::models::Collection;
use crate::{Error, Result};

/// Whole-document persistence for the recipe collection
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Fetch and parse the persisted document
    ///
    /// # Errors
    /// `Error::Load` on retrieval or parse failure.
    async fn load(&self) -> Result<Collection>;

    /// Overwrite the persisted document with `collection`
    ///
    /// # Errors
    /// `Error::Save` if the write is rejected or the transport fails. The
    /// persisted document is then exactly as before the attempt.
    async fn save(&self, collection: &Collection) -> Result<()>;
}

/// JSON file on local disk
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty document if none exists yet
    pub async fn ensure_exists(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }

        info!("Creating empty recipe document at {}", self.path.display());
        self.save(&Collection::default()).await
    }

    /// Sibling temp file the new document is written to before the rename
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StorageGateway for FileGateway {
    async fn load(&self) -> Result<Collection> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!("Failed to read {}: {}", self.path.display(), e);
            Error::Load(format!("{}: {}", self.path.display(), e))
        })?;

        let collection: Collection = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse {}: {}", self.path.display(), e);
            Error::Load(format!("{}: {}", self.path.display(), e))
        })?;

        debug!(
            "Loaded {} recipes in {} categories from {}",
            collection.recipe_count(),
            collection.categories.len(),
            self.path.display()
        );
        Ok(collection)
    }

    async fn save(&self, collection: &Collection) -> Result<()> {
        let body = collection
            .to_pretty_json()
            .map_err(|e| Error::Save(e.to_string()))?;

        // Write-then-rename: readers see either the old or the new document
        let temp = self.temp_path();
        let result = match tokio::fs::write(&temp, body.as_bytes()).await {
            Ok(()) => tokio::fs::rename(&temp, &self.path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!("Failed to save {}: {}", self.path.display(), e);
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(Error::Save(format!("{}: {}", self.path.display(), e)));
        }

        debug!("Saved {} recipes to {}", collection.recipe_count(), self.path.display());
        Ok(())
    }
}

/// HTTP resource read with `GET` and replaced with `PUT`
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    url: String,
}

impl HttpGateway {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StorageGateway for HttpGateway {
    async fn load(&self) -> Result<Collection> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Failed to fetch {}: {}", self.url, e);
                Error::Load(e.to_string())
            })?;

        response.json::<Collection>().await.map_err(|e| {
            error!("Failed to parse response from {}: {}", self.url, e);
            Error::Load(e.to_string())
        })
    }

    async fn save(&self, collection: &Collection) -> Result<()> {
        let body = collection
            .to_pretty_json()
            .map_err(|e| Error::Save(e.to_string()))?;

        let response = self
            .client
            .put(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send recipes to {}: {}", self.url, e);
                Error::Save(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("Save rejected by {}: {}", self.url, status);
            return Err(Error::Save(format!("server responded with {}", status)));
        }

        debug!("Saved {} recipes to {}", collection.recipe_count(), self.url);
        Ok(())
    }
}
