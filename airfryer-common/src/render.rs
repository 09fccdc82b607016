//! View rendering
//!
//! Pure projection from a collection to a grouped display tree. The whole
//! tree is rebuilt on every state change; nothing is diffed.

use std::fmt::Write;

use serde::Serialize;

use crate::models::{Collection, InlineField, Recipe, RecipeAddress};
use crate::store::name_matches;

/// Text shown when no row would be rendered
pub const EMPTY_PLACEHOLDER: &str = "No recipes found";

/// Rendered representation of the recipe list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayTree {
    /// Nothing to show; replaces the table structure entirely
    Empty { placeholder: String },
    /// One table per non-empty category, in collection order
    Tables { tables: Vec<CategoryTable> },
}

/// Header block plus rows for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTable {
    pub title: String,
    pub category_index: usize,
    pub rows: Vec<RecipeRow>,
}

/// Main row (always visible) and the detail fields revealed on expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRow {
    pub address: RecipeAddress,
    pub name: String,
    pub temperature: String,
    pub cook_time: String,
    pub details: Vec<DetailField>,
}

/// Inline-editable value in the detail row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub field: InlineField,
    pub label: String,
    pub value: String,
}

/// Render every recipe; addresses point into `collection`
pub fn render(collection: &Collection) -> DisplayTree {
    build(collection, |_| true)
}

/// Render the recipes whose name matches `query`
///
/// Unlike `render(&store.search(query))`, rows keep the addresses they have
/// in the unfiltered `collection`, so actions taken on a filtered view reach
/// the right recipe.
pub fn render_search(collection: &Collection, query: &str) -> DisplayTree {
    let needle = query.to_lowercase();
    build(collection, |recipe| name_matches(recipe, &needle))
}

fn build(collection: &Collection, keep: impl Fn(&Recipe) -> bool) -> DisplayTree {
    let tables: Vec<CategoryTable> = collection
        .categories
        .iter()
        .enumerate()
        .filter_map(|(category_index, category)| {
            let rows: Vec<RecipeRow> = category
                .items
                .iter()
                .enumerate()
                .filter(|(_, recipe)| keep(*recipe))
                .map(|(item_index, recipe)| {
                    row(RecipeAddress::new(category_index, item_index), recipe)
                })
                .collect();

            (!rows.is_empty()).then(|| CategoryTable {
                title: category.name.clone(),
                category_index,
                rows,
            })
        })
        .collect();

    if tables.is_empty() {
        DisplayTree::Empty {
            placeholder: EMPTY_PLACEHOLDER.to_string(),
        }
    } else {
        DisplayTree::Tables { tables }
    }
}

fn row(address: RecipeAddress, recipe: &Recipe) -> RecipeRow {
    RecipeRow {
        address,
        name: recipe.name.clone(),
        temperature: recipe.temperature.clone(),
        cook_time: recipe.cook_time.clone(),
        details: InlineField::ALL
            .iter()
            .map(|&field| DetailField {
                field,
                label: field.label().to_string(),
                value: recipe.field(field).to_string(),
            })
            .collect(),
    }
}

impl DisplayTree {
    /// Number of recipe rows in the tree
    pub fn row_count(&self) -> usize {
        match self {
            DisplayTree::Empty { .. } => 0,
            DisplayTree::Tables { tables } => tables.iter().map(|t| t.rows.len()).sum(),
        }
    }

    /// Markup swapped into the page's recipe container
    ///
    /// Behavior is attached by the page through `data-*` attributes; no
    /// handlers are embedded in the generated markup.
    pub fn to_html(&self) -> String {
        let tables = match self {
            DisplayTree::Empty { placeholder } => {
                return format!("<p class=\"empty-state\">{}</p>", escape_html(placeholder));
            }
            DisplayTree::Tables { tables } => tables,
        };

        let mut html = String::new();
        for table in tables {
            table.write_html(&mut html);
        }
        html
    }
}

impl CategoryTable {
    fn write_html(&self, html: &mut String) {
        // Writing into a String cannot fail
        let _ = write!(
            html,
            "<table>\
             <thead>\
             <tr class=\"header-row\"><td colspan=\"3\">\
             <span class=\"material-symbols-rounded\">restaurant_menu</span> {title}\
             </td></tr>\
             <tr><th class=\"col-name\">Name</th>\
             <th class=\"col-temp\">Temperature</th>\
             <th class=\"col-time\">Cook time</th></tr>\
             </thead><tbody>",
            title = escape_html(&self.title),
        );
        for row in &self.rows {
            row.write_html(html);
        }
        html.push_str("</tbody></table>");
    }
}

impl RecipeRow {
    fn write_html(&self, html: &mut String) {
        let RecipeAddress { category, item } = self.address;
        let row_id = format!("row-{}-{}", category, item);
        let data = format!("data-category=\"{}\" data-item=\"{}\"", category, item);

        let _ = write!(
            html,
            "<tr class=\"main-row\" data-details=\"{row_id}\">\
             <td class=\"col-name\">{name}</td>\
             <td class=\"col-temp\">{temperature}</td>\
             <td class=\"col-time\">{cook_time}</td>\
             </tr>\
             <tr id=\"{row_id}\" class=\"detail-row\" hidden>\
             <td colspan=\"3\"><div class=\"detail-content\"><div class=\"detail-grid\">",
            name = escape_html(&self.name),
            temperature = escape_html(&self.temperature),
            cook_time = escape_html(&self.cook_time),
        );

        for detail in &self.details {
            let _ = write!(
                html,
                "<div class=\"detail-item\"><strong>{label}:</strong> \
                 <span class=\"inline-edit\" contenteditable=\"true\" {data} data-field=\"{key}\">{value}</span>\
                 </div>",
                label = escape_html(&detail.label),
                key = detail.field.key(),
                value = escape_html(&detail.value),
            );
        }

        let _ = write!(
            html,
            "</div><div class=\"action-buttons\">\
             <button class=\"btn edit-btn\" data-action=\"edit\" {data}>\
             <span class=\"material-symbols-rounded\">edit</span></button>\
             <button class=\"btn duplicate-btn\" data-action=\"duplicate\" {data}>\
             <span class=\"material-symbols-rounded\">content_copy</span></button>\
             <button class=\"btn delete-btn\" data-action=\"delete\" {data}>\
             <span class=\"material-symbols-rounded\">delete</span></button>\
             </div></div></td></tr>",
        );
    }
}

/// Escape text for use in element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
