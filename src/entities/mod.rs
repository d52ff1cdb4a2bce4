//! Entity type definitions
//!
//! Brigade manages two entity types as plain-text YAML files:
//!
//! - [`Ingredient`] - Priced pantry items with waste rates
//! - [`Recipe`] - Dishes with ingredient lines, sub-recipe lines, and pricing

pub mod ingredient;
pub mod numeric;
pub mod recipe;

pub use ingredient::Ingredient;
pub use recipe::{IngredientLine, Recipe, SubrecipeLine};
