//! In-memory recipe store
//!
//! Source of truth during a session. Every operation is synchronous and
//! addresses recipes positionally; persistence is sequenced separately by the
//! controller after each mutation.

use tracing::debug;

use crate::models::{Category, Collection, InlineField, Recipe, RecipeAddress};
use crate::{Error, Result};

/// Ordered categories of ordered recipes, owned explicitly by the caller
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    collection: Collection,
}

impl RecipeStore {
    pub fn new(collection: Collection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Recipe at `address`, if it exists
    pub fn get(&self, address: RecipeAddress) -> Option<&Recipe> {
        self.collection
            .categories
            .get(address.category)
            .and_then(|c| c.items.get(address.item))
    }

    /// Category names in display order
    pub fn category_names(&self) -> Vec<String> {
        self.collection
            .categories
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }

    /// Filtered copy: recipes whose name contains `query` case-insensitively
    ///
    /// Categories without a match are left out of the returned value; the
    /// store itself is never touched. An empty query returns everything.
    pub fn search(&self, query: &str) -> Collection {
        if query.is_empty() {
            return self.collection.clone();
        }

        let needle = query.to_lowercase();
        let categories = self
            .collection
            .categories
            .iter()
            .filter_map(|category| {
                let items: Vec<Recipe> = category
                    .items
                    .iter()
                    .filter(|item| name_matches(item, &needle))
                    .cloned()
                    .collect();
                (!items.is_empty()).then(|| Category::new(category.name.clone(), items))
            })
            .collect();

        Collection::new(categories)
    }

    /// Append to the first category named exactly `category`, or create it at the end
    pub fn add(&mut self, category: &str, recipe: Recipe) -> RecipeAddress {
        let categories = &mut self.collection.categories;
        let category_index = match categories.iter().position(|c| c.name == category) {
            Some(index) => index,
            None => {
                debug!("Creating category '{}'", category);
                categories.push(Category::new(category, Vec::new()));
                categories.len() - 1
            }
        };

        let items = &mut categories[category_index].items;
        items.push(recipe);
        RecipeAddress::new(category_index, items.len() - 1)
    }

    /// Replace the recipe in place; it never changes category
    ///
    /// Unknown document keys of the old recipe carry over unless the
    /// replacement brings its own.
    pub fn update(&mut self, address: RecipeAddress, mut recipe: Recipe) -> Result<()> {
        let slot = self.get_mut(address)?;
        if recipe.extra.is_empty() {
            recipe.extra = std::mem::take(&mut slot.extra);
        }
        *slot = recipe;
        Ok(())
    }

    /// Single-field edit used by inline editing
    pub fn update_field(
        &mut self,
        address: RecipeAddress,
        field: InlineField,
        value: String,
    ) -> Result<()> {
        self.get_mut(address)?.set_field(field, value);
        Ok(())
    }

    /// Append a "(copy)" of the recipe to the end of its own category
    pub fn duplicate(&mut self, address: RecipeAddress) -> Result<RecipeAddress> {
        let copy = self
            .get(address)
            .ok_or(Error::InvalidAddress(address))?
            .duplicated();
        let items = &mut self.collection.categories[address.category].items;
        items.push(copy);
        Ok(RecipeAddress::new(address.category, items.len() - 1))
    }

    /// Delete the recipe, dropping its category once empty
    ///
    /// Removing a category shifts every later category index down by one.
    pub fn remove(&mut self, address: RecipeAddress) -> Result<Recipe> {
        if self.get(address).is_none() {
            return Err(Error::InvalidAddress(address));
        }

        let categories = &mut self.collection.categories;
        let removed = categories[address.category].items.remove(address.item);
        if categories[address.category].items.is_empty() {
            let category = categories.remove(address.category);
            debug!("Removed empty category '{}'", category.name);
        }
        Ok(removed)
    }

    /// Wholesale replacement, used by import and full-document writes
    pub fn replace(&mut self, collection: Collection) -> Collection {
        std::mem::replace(&mut self.collection, collection)
    }

    fn get_mut(&mut self, address: RecipeAddress) -> Result<&mut Recipe> {
        self.collection
            .categories
            .get_mut(address.category)
            .and_then(|c| c.items.get_mut(address.item))
            .ok_or(Error::InvalidAddress(address))
    }
}

/// Case-insensitive substring match on the recipe name; `needle` is lowercase
pub(crate) fn name_matches(recipe: &Recipe, needle: &str) -> bool {
    recipe.name.to_lowercase().contains(needle)
}
