/*!
 * Core types and data structures for itemview
 */

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::icon::Icon;
use crate::utils::contains_ignore_case;

/// Placeholder used when an item has no `id` or `name` field
pub const MISSING_VALUE: &str = "N/A";

/// Placeholder used when an item has no `description` field
pub const MISSING_DESCRIPTION: &str = "No description.";

/// Name the exports give to unusable placeholder records
pub const PLACEHOLDER_NAME: &str = ".";

/// Attribute map of an item, in document order
pub type Attributes = IndexMap<String, String>;

/// A single decoded item record
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Item identifier as written in the export
    pub id: String,
    /// Short item name
    pub name: String,
    /// Item description
    pub description: String,
    /// Every named field of the record, except the icon
    pub attributes: Attributes,
    /// Decoded icon, if the record carried a valid one
    #[serde(skip)]
    pub icon: Option<Icon>,
}

impl Item {
    /// Build an item from its attribute map, deriving the identity fields
    pub fn new(attributes: Attributes, icon: Option<Icon>) -> Self {
        let field = |key: &str, default: &str| {
            attributes
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            id: field("id", MISSING_VALUE),
            name: field("name", MISSING_VALUE),
            description: field("description", MISSING_DESCRIPTION),
            attributes,
            icon,
        }
    }

    /// Attribute value by key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Preferred display name: the singular log name when present
    pub fn display_name(&self) -> &str {
        self.attribute("log-name-singular").unwrap_or(self.name.as_str())
    }

    /// Whether this is a placeholder record hidden from every listing
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }

    /// Case-insensitive match of `query` against id or name
    pub fn matches(&self, query: &str) -> bool {
        contains_ignore_case(&self.id, query) || contains_ignore_case(&self.name, query)
    }
}

/// All items loaded from one export file
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// File the catalog was loaded from
    source: PathBuf,
    /// Every item record, placeholders included
    items: Vec<Item>,
}

impl Catalog {
    /// Create a catalog from decoded items
    pub fn new(source: impl Into<PathBuf>, items: Vec<Item>) -> Self {
        Self {
            source: source.into(),
            items,
        }
    }

    /// File the catalog was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of records loaded, placeholders included
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Number of records shown to the user
    pub fn usable_count(&self) -> usize {
        self.usable().count()
    }

    /// Items shown to the user, in document order
    pub fn usable(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| !item.is_placeholder())
    }

    /// Usable items whose id or name contains `query`.
    ///
    /// A blank query returns every usable item.
    pub fn search(&self, query: &str) -> Vec<&Item> {
        let query = query.trim();
        if query.is_empty() {
            return self.usable().collect();
        }
        self.usable().filter(|item| item.matches(query)).collect()
    }

    /// First usable item with the exact id `key`, else the first whose name
    /// equals `key` ignoring case
    pub fn find(&self, key: &str) -> Option<&Item> {
        let key = key.trim();
        self.usable().find(|item| item.id == key).or_else(|| {
            let lowered = key.to_lowercase();
            self.usable().find(|item| item.name.to_lowercase() == lowered)
        })
    }
}
