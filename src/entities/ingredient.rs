//! Ingredient entity - a priced pantry item
//!
//! Ingredients carry the purchase price and waste rate that recipe lines
//! copy when an ingredient is assigned to a recipe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, Status};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::numeric::{finite_or_zero, lenient_f64};

/// Ingredient entity - priced pantry item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique identifier (ING-...)
    pub id: EntityId,

    /// Ingredient name
    pub name: String,

    /// Purchase unit (kg, l, piece, ...)
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Purchase price per unit
    #[serde(default, deserialize_with = "lenient_f64")]
    pub base_price: f64,

    /// Fractional loss rate (0.05 = 5% trim/spoilage)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub waste_percent: f64,

    /// Category (produce, dairy, dry goods, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Preferred supplier name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

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

fn default_unit() -> String {
    "kg".to_string()
}

fn default_revision() -> u32 {
    1
}

impl Entity for Ingredient {
    const PREFIX: &'static str = "ING";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
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

impl Default for Ingredient {
    fn default() -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Ing),
            name: String::new(),
            unit: default_unit(),
            base_price: 0.0,
            waste_percent: 0.0,
            category: None,
            supplier: None,
            tags: Vec::new(),
            status: Status::default(),
            created: Utc::now(),
            author: String::new(),
            entity_revision: 1,
        }
    }
}

impl Ingredient {
    /// Create a new ingredient
    pub fn new(name: impl Into<String>, base_price: f64, author: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Ing),
            name: name.into(),
            base_price,
            author: author.into(),
            created: Utc::now(),
            ..Default::default()
        }
    }

    /// Waste-adjusted cost of one purchase unit.
    ///
    /// Negative waste rates are clamped to zero so the effective cost can
    /// never fall below the purchase price.
    pub fn effective_unit_cost(&self) -> f64 {
        let base = finite_or_zero(self.base_price).max(0.0);
        let waste = finite_or_zero(self.waste_percent).max(0.0);
        base * (1.0 + waste)
    }
}
