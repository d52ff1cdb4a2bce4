//! Recipe entity - a dish with priced ingredient and sub-recipe lines
//!
//! A recipe lists the ingredients used per serving plus any other recipes
//! used as components (stocks, sauces, doughs). Each ingredient line caches
//! the priced fields copied from the ingredient record at assignment time so
//! a recipe file is self-contained for costing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Status};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::numeric::{lenient_f64, lenient_servings};

/// One ingredient used by a recipe, with cached pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Referenced ingredient (ING-...)
    pub ingredient: EntityId,

    /// Cached ingredient name for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Quantity used per serving, in the ingredient's unit
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity_per_serving: f64,

    /// Unit the quantity is expressed in
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Purchase price per unit, copied from the ingredient record
    #[serde(default, deserialize_with = "lenient_f64")]
    pub base_price: f64,

    /// Fractional loss rate, copied from the ingredient record
    #[serde(default, deserialize_with = "lenient_f64")]
    pub waste_percent: f64,

    /// Recipe section this line belongs to (garnish, sauce, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

fn default_unit() -> String {
    "kg".to_string()
}

/// One sub-recipe used as a component of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubrecipeLine {
    /// Referenced child recipe (RCP-...)
    pub recipe: EntityId,

    /// Cached child recipe title for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Child servings consumed per parent serving
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity_per_serving: f64,

    /// Free-form preparation notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Recipe entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier (RCP-...)
    pub id: EntityId,

    /// Recipe title
    pub title: String,

    /// Detailed description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Diners the listed net price covers (at least 1)
    #[serde(default = "default_servings", deserialize_with = "lenient_servings")]
    pub servings: f64,

    /// Minimum batch size the recipe must be prepared in (at least 1)
    #[serde(
        default = "default_servings",
        deserialize_with = "lenient_servings"
    )]
    pub production_servings: f64,

    /// Total sale price for `servings` diners
    #[serde(default, deserialize_with = "lenient_f64")]
    pub net_price: f64,

    /// Ingredients used directly by this recipe
    #[serde(default)]
    pub ingredient_lines: Vec<IngredientLine>,

    /// Other recipes used as components
    #[serde(default)]
    pub subrecipe_lines: Vec<SubrecipeLine>,

    /// Classification tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Current status
    #[serde(default)]
    pub status: Status,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author name
    pub author: String,

    /// Revision counter
    #[serde(default = "default_revision")]
    pub entity_revision: u32,
}

fn default_servings() -> f64 {
    1.0
}

fn default_revision() -> u32 {
    1
}

impl Entity for Recipe {
    const PREFIX: &'static str = "RCP";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        match self.status {
            Status::Draft => "draft",
            Status::Active => "active",
            Status::Archived => "archived",
        }
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Rcp),
            title: String::new(),
            description: None,
            servings: 1.0,
            production_servings: 1.0,
            net_price: 0.0,
            ingredient_lines: Vec::new(),
            subrecipe_lines: Vec::new(),
            tags: Vec::new(),
            status: Status::default(),
            created: Utc::now(),
            author: String::new(),
            entity_revision: 1,
        }
    }
}

impl Recipe {
    /// Create a new recipe
    pub fn new(title: impl Into<String>, servings: f64, author: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Rcp),
            title: title.into(),
            servings: servings.max(1.0),
            author: author.into(),
            created: Utc::now(),
            ..Default::default()
        }
    }

    /// Sale price per diner, derived from the total net price.
    ///
    /// `net_price` is the stored value; this is always the quotient view.
    pub fn price_per_serving(&self) -> f64 {
        if self.servings > 0.0 {
            self.net_price / self.servings
        } else {
            0.0
        }
    }

    /// Add an ingredient line
    pub fn add_ingredient_line(&mut self, line: IngredientLine) {
        self.ingredient_lines.push(line);
    }

    /// Add a sub-recipe line
    pub fn add_subrecipe_line(&mut self, line: SubrecipeLine) {
        self.subrecipe_lines.push(line);
    }

    /// Check whether this recipe directly references the given recipe id
    pub fn references(&self, id: &EntityId) -> bool {
        self.subrecipe_lines.iter().any(|l| &l.recipe == id)
    }

    /// Total number of lines (ingredients plus sub-recipes)
    pub fn line_count(&self) -> usize {
        self.ingredient_lines.len() + self.subrecipe_lines.len()
    }
}
