//! Recipe collection data model
//!
//! Field names on the Rust side are English; the persisted document keeps the
//! keys it has always used (`menge`, `vorbereitung`, ...) so existing
//! `data.json` files and exports stay compatible.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Suffix appended to the name of a duplicated recipe
pub const COPY_SUFFIX: &str = " (copy)";

/// One dish entry. All fields are free-form text.
///
/// Serialization goes through `RecipeRecord` so a document written back
/// keeps its shape: keys this program does not know survive in `extra`, and
/// known keys the source left out stay out while they are still empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecipeRecord", into = "RecipeRecord")]
pub struct Recipe {
    pub name: String,
    pub amount: String,
    pub preparation: String,
    pub oil_toss: String,
    /// Stored and displayed as text, never parsed as a unit
    pub temperature: String,
    pub cook_time: String,
    /// Keys not modelled above, written back unchanged
    pub extra: Map<String, Value>,
    /// Known keys missing from the document this recipe was read from
    absent: Vec<&'static str>,
}

/// On-disk shape of a recipe
#[derive(Serialize, Deserialize)]
struct RecipeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(rename = "menge", default, skip_serializing_if = "Option::is_none")]
    amount: Option<String>,

    #[serde(rename = "vorbereitung", default, skip_serializing_if = "Option::is_none")]
    preparation: Option<String>,

    #[serde(rename = "in_oel_schwenken", default, skip_serializing_if = "Option::is_none")]
    oil_toss: Option<String>,

    #[serde(rename = "temperatur", default, skip_serializing_if = "Option::is_none")]
    temperature: Option<String>,

    #[serde(rename = "garzeit", default, skip_serializing_if = "Option::is_none")]
    cook_time: Option<String>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RecipeRecord> for Recipe {
    fn from(record: RecipeRecord) -> Self {
        let mut absent = Vec::new();
        let mut take = |value: Option<String>, key: &'static str| {
            value.unwrap_or_else(|| {
                absent.push(key);
                String::new()
            })
        };

        let name = take(record.name, "name");
        let amount = take(record.amount, "menge");
        let preparation = take(record.preparation, "vorbereitung");
        let oil_toss = take(record.oil_toss, "in_oel_schwenken");
        let temperature = take(record.temperature, "temperatur");
        let cook_time = take(record.cook_time, "garzeit");

        Self {
            name,
            amount,
            preparation,
            oil_toss,
            temperature,
            cook_time,
            extra: record.extra,
            absent,
        }
    }
}

impl From<Recipe> for RecipeRecord {
    fn from(recipe: Recipe) -> Self {
        let Recipe {
            name,
            amount,
            preparation,
            oil_toss,
            temperature,
            cook_time,
            extra,
            absent,
        } = recipe;

        // Missing in the source and never filled in: leave it missing
        let keep = |value: String, key: &str| {
            if value.is_empty() && absent.iter().any(|k| *k == key) {
                None
            } else {
                Some(value)
            }
        };

        Self {
            name: keep(name, "name"),
            amount: keep(amount, "menge"),
            preparation: keep(preparation, "vorbereitung"),
            oil_toss: keep(oil_toss, "in_oel_schwenken"),
            temperature: keep(temperature, "temperatur"),
            cook_time: keep(cook_time, "garzeit"),
            extra,
        }
    }
}

impl Recipe {
    /// Convenience constructor for the fields shown in the table
    pub fn new(
        name: impl Into<String>,
        temperature: impl Into<String>,
        cook_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            temperature: temperature.into(),
            cook_time: cook_time.into(),
            ..Default::default()
        }
    }

    /// Copy of this recipe with the duplicate marker appended to its name
    pub fn duplicated(&self) -> Self {
        Self {
            name: format!("{}{}", self.name, COPY_SUFFIX),
            ..self.clone()
        }
    }

    pub fn field(&self, field: InlineField) -> &str {
        match field {
            InlineField::Amount => &self.amount,
            InlineField::Preparation => &self.preparation,
            InlineField::OilToss => &self.oil_toss,
        }
    }

    pub fn set_field(&mut self, field: InlineField, value: String) {
        match field {
            InlineField::Amount => self.amount = value,
            InlineField::Preparation => self.preparation = value,
            InlineField::OilToss => self.oil_toss = value,
        }
    }
}

/// Named group of recipes. The name is the lookup key when adding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,

    #[serde(default)]
    pub items: Vec<Recipe>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn new(name: impl Into<String>, items: Vec<Recipe>) -> Self {
        Self {
            name: name.into(),
            items,
            extra: Map::new(),
        }
    }
}

/// Root persisted object: `{ "recipes": [ { "category", "items" } ] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "recipes")]
    pub categories: Vec<Category>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collection {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            extra: Map::new(),
        }
    }

    /// Drop categories without recipes; they are never persisted
    pub fn drop_empty_categories(&mut self) {
        self.categories.retain(|c| !c.items.is_empty());
    }

    /// Total number of recipes across all categories
    pub fn recipe_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_count() == 0
    }

    /// Human-formatted document: declaration key order, 2-space indentation
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Positional address of a recipe: (category index, item index)
///
/// Valid only against the collection it was taken from. Any removal that
/// empties a category shifts the indices of every later category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeAddress {
    pub category: usize,
    pub item: usize,
}

impl RecipeAddress {
    pub fn new(category: usize, item: usize) -> Self {
        Self { category, item }
    }
}

/// Fields editable in place from the expanded detail row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineField {
    #[serde(rename = "menge")]
    Amount,
    #[serde(rename = "vorbereitung")]
    Preparation,
    #[serde(rename = "in_oel_schwenken")]
    OilToss,
}

impl InlineField {
    pub const ALL: [InlineField; 3] = [
        InlineField::Amount,
        InlineField::Preparation,
        InlineField::OilToss,
    ];

    /// Key used in the persisted document and in rendered markup
    pub fn key(self) -> &'static str {
        match self {
            InlineField::Amount => "menge",
            InlineField::Preparation => "vorbereitung",
            InlineField::OilToss => "in_oel_schwenken",
        }
    }

    /// Label shown next to the field in the detail row
    pub fn label(self) -> &'static str {
        match self {
            InlineField::Amount => "Amount",
            InlineField::Preparation => "Preparation",
            InlineField::OilToss => "Toss in oil",
        }
    }
}
