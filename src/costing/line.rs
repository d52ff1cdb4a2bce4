//! Line resolvers - per-line cost of ingredients and sub-recipe components
//!
//! Both resolvers are pure functions. Input fields have already passed the
//! lenient numeric coercion at deserialization time; the resolvers only
//! guard against non-finite values and negative waste rates.

use crate::entities::numeric::finite_or_zero;
use crate::entities::{IngredientLine, SubrecipeLine};

/// Cost of one ingredient line scaled to the recipe's serving count.
///
/// `quantity_per_serving * servings * base_price * (1 + waste_percent)`,
/// with `waste_percent` below zero clamped to zero.
pub fn ingredient_line_cost(line: &IngredientLine, servings: f64) -> f64 {
    let quantity = finite_or_zero(line.quantity_per_serving).max(0.0);
    let base = finite_or_zero(line.base_price).max(0.0);
    let waste = finite_or_zero(line.waste_percent).max(0.0);
    quantity * finite_or_zero(servings) * base * (1.0 + waste)
}

/// Cost of one sub-recipe line scaled to the parent's serving count.
///
/// The child's per-serving cost must already be resolved by the aggregator;
/// given that value this is a plain scaling.
pub fn subrecipe_line_cost(
    line: &SubrecipeLine,
    parent_servings: f64,
    child_cost_per_serving: f64,
) -> f64 {
    let quantity = finite_or_zero(line.quantity_per_serving).max(0.0);
    quantity * finite_or_zero(parent_servings) * finite_or_zero(child_cost_per_serving)
}
