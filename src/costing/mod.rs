//! Costing engine - recipe cost aggregation, pricing sync, and margins
//!
//! The engine is pure: all entity data is loaded before a pass begins, each
//! invocation owns its resolution state, and identical inputs always yield
//! identical metrics. Only a circular sub-recipe reference is an error;
//! every other anomaly degrades to a zeroed, renderable value.

pub mod aggregate;
pub mod line;
pub mod margin;
pub mod sync;

pub use aggregate::{resolve_recipe_cost, CostingError, RecipeCost, RecipeSource};
pub use line::{ingredient_line_cost, subrecipe_line_cost};
pub use margin::{compute_cost_metrics, derive_metrics, CostMetrics, CostingConfig};
pub use sync::{apply_field_edit, Edit, PricingState};
