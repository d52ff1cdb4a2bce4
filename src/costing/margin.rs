//! Margin and suggested-price derivation
//!
//! Turns an aggregated cost plus the recipe's current pricing into the
//! metrics block the presentation layer renders. Every division is guarded:
//! a zero or negative denominator yields 0, never NaN or infinity, so the
//! caller always has a renderable value.

use serde::Serialize;

use crate::costing::aggregate::{resolve_recipe_cost, CostingError, RecipeSource};
use crate::entities::numeric::finite_or_zero;
use crate::entities::Recipe;

/// Costing configuration injected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostingConfig {
    /// Target food-cost percentage in (0, 100]
    pub target_food_cost_percent: f64,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            target_food_cost_percent: 30.0,
        }
    }
}

impl CostingConfig {
    /// Build a config, falling back to the default for values outside (0, 100]
    pub fn with_target(target: f64) -> Self {
        if target.is_finite() && target > 0.0 && target <= 100.0 {
            Self {
                target_food_cost_percent: target,
            }
        } else {
            Self::default()
        }
    }
}

/// Derived cost and margin metrics for one recipe.
///
/// Recomputed from scratch on demand; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostMetrics {
    /// Total production cost at the current serving count
    pub total_cost: f64,
    /// Production cost per serving
    pub cost_per_serving: f64,
    /// Total sale price for `servings` diners
    pub net_price: f64,
    /// Sale price per serving
    pub price_per_serving: f64,
    /// Absolute margin (net price minus total cost)
    pub current_margin: f64,
    /// Margin as a percentage of the net price
    pub current_margin_percent: f64,
    /// Per-serving price at which cost hits the target food-cost percentage
    pub suggested_price: f64,
    /// Actual food-cost percentage at the current price
    pub food_cost_percent: f64,
    /// Diners the net price covers
    pub servings: f64,
    /// Minimum batch size
    pub production_servings: f64,
}

/// Derive metrics from already-aggregated numbers. Pure arithmetic.
pub fn derive_metrics(
    total_cost: f64,
    servings: f64,
    production_servings: f64,
    net_price: f64,
    config: &CostingConfig,
) -> CostMetrics {
    let total_cost = finite_or_zero(total_cost);
    let net_price = finite_or_zero(net_price);

    let cost_per_serving = guarded_div(total_cost, servings);
    let price_per_serving = guarded_div(net_price, servings);

    let current_margin = net_price - total_cost;
    let current_margin_percent = if net_price > 0.0 {
        current_margin / net_price * 100.0
    } else {
        0.0
    };

    // Price point at which cost_per_serving is exactly the target share of
    // the sale price: the standard food-cost-percentage heuristic.
    let suggested_price = if cost_per_serving > 0.0 {
        guarded_div(cost_per_serving, config.target_food_cost_percent / 100.0)
    } else {
        0.0
    };

    let food_cost_percent = if net_price > 0.0 {
        total_cost / net_price * 100.0
    } else {
        0.0
    };

    CostMetrics {
        total_cost,
        cost_per_serving,
        net_price,
        price_per_serving,
        current_margin,
        current_margin_percent,
        suggested_price,
        food_cost_percent,
        servings,
        production_servings,
    }
}

fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Compute the full metrics block for a recipe.
///
/// Aggregates the cost tree (failing on circular sub-recipe references) and
/// derives margin and suggested price from the recipe's current pricing.
pub fn compute_cost_metrics(
    recipe: &Recipe,
    source: &impl RecipeSource,
    config: &CostingConfig,
) -> Result<CostMetrics, CostingError> {
    let cost = resolve_recipe_cost(recipe, source)?;
    let servings = recipe.servings.max(1.0);
    // The batch size invariant (at least 1, at most `servings`) is restored
    // here in case the file was hand-edited out of range.
    let production_servings = recipe.production_servings.max(1.0).min(servings);
    Ok(derive_metrics(
        cost.total_cost,
        servings,
        production_servings,
        recipe.net_price,
        config,
    ))
}
