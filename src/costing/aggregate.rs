//! Recipe cost aggregation with cycle detection
//!
//! Resolving a recipe's cost walks its sub-recipe tree bottom-up. The data
//! layer places no restriction on nesting, so the resolution path doubles as
//! the cycle guard: re-entering a recipe already on the path is a hard error,
//! never silently resolved. Within one top-level call, resolved per-serving
//! costs are memoized by recipe id so a sub-recipe referenced from several
//! branches is only walked once.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::identity::EntityId;
use crate::costing::line::{ingredient_line_cost, subrecipe_line_cost};
use crate::entities::Recipe;

/// Source of child recipes for recursive resolution.
///
/// All data is expected to be loaded before a computation pass begins; the
/// aggregator never performs I/O.
pub trait RecipeSource {
    /// Look up a recipe by id, or None if unknown
    fn recipe(&self, id: &EntityId) -> Option<&Recipe>;
}

/// Resolved cost of one recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecipeCost {
    /// Total production cost at the recipe's serving count
    pub total_cost: f64,

    /// Cost per serving
    pub cost_per_serving: f64,
}

/// Errors raised by cost resolution
#[derive(Debug, Error)]
pub enum CostingError {
    #[error("cannot compute cost: circular sub-recipe reference: {}", format_cycle(path))]
    CyclicReference {
        /// Resolution path ending with the re-entered recipe
        path: Vec<EntityId>,
    },
}

fn format_cycle(path: &[EntityId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Resolve a recipe's total cost and cost per serving.
///
/// Deterministic and side-effect free: identical inputs always yield
/// identical output. Each call owns its resolution path and memo, so two
/// resolutions never share state.
pub fn resolve_recipe_cost(
    recipe: &Recipe,
    source: &impl RecipeSource,
) -> Result<RecipeCost, CostingError> {
    let mut path = Vec::new();
    let mut memo = HashMap::new();
    resolve_on_path(recipe, source, &mut path, &mut memo)
}

fn resolve_on_path(
    recipe: &Recipe,
    source: &impl RecipeSource,
    path: &mut Vec<EntityId>,
    memo: &mut HashMap<EntityId, f64>,
) -> Result<RecipeCost, CostingError> {
    if path.contains(&recipe.id) {
        let mut cycle = path.clone();
        cycle.push(recipe.id.clone());
        return Err(CostingError::CyclicReference { path: cycle });
    }
    path.push(recipe.id.clone());

    let servings = recipe.servings.max(1.0);
    let mut total_cost = 0.0;

    for line in &recipe.ingredient_lines {
        total_cost += ingredient_line_cost(line, servings);
    }

    for line in &recipe.subrecipe_lines {
        // Memoized costs are only ever for completed resolutions, so a memo
        // hit can never mask a cycle through the current path.
        let child_cost_per_serving = match memo.get(&line.recipe) {
            Some(&cached) => cached,
            None => match source.recipe(&line.recipe) {
                Some(child) => {
                    let resolved = resolve_on_path(child, source, path, memo)?;
                    memo.insert(line.recipe.clone(), resolved.cost_per_serving);
                    resolved.cost_per_serving
                }
                // Unknown reference contributes nothing, matching the
                // forgiving-input policy for entity data.
                None => 0.0,
            },
        };
        total_cost += subrecipe_line_cost(line, servings, child_cost_per_serving);
    }

    path.pop();

    Ok(RecipeCost {
        total_cost,
        cost_per_serving: total_cost / servings,
    })
}
