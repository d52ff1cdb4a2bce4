//! Field synchronization - servings, net price, and per-serving price
//!
//! The three pricing fields are two independent values plus a quotient, and
//! the presentation layer reports exactly one edited field per event. This
//! module keeps them consistent as a pure reducer: no object with a hidden
//! "current mode", just `(state, edit) -> state`.

use serde::{Deserialize, Serialize};

use crate::entities::numeric::finite_or_zero;
use crate::entities::Recipe;

/// The synchronized pricing triple of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingState {
    /// Diners the net price covers (at least 1)
    pub servings: f64,

    /// Total sale price for `servings` diners
    pub net_price: f64,

    /// Per-serving price, once one has been confirmed by an edit.
    ///
    /// None until a price has been entered: changing the headcount before
    /// ever entering a price must leave the net price untouched.
    pub price_per_serving: Option<f64>,
}

impl PricingState {
    /// Build the state for a stored recipe.
    ///
    /// A recipe with a positive net price has implicitly confirmed its
    /// per-serving price; a zero-priced recipe has not.
    pub fn of_recipe(recipe: &Recipe) -> Self {
        let servings = recipe.servings.max(1.0);
        let net_price = finite_or_zero(recipe.net_price);
        let price_per_serving = if net_price > 0.0 {
            Some(net_price / servings)
        } else {
            None
        };
        Self {
            servings,
            net_price,
            price_per_serving,
        }
    }

    /// Write the state back onto a recipe
    pub fn store(&self, recipe: &mut Recipe) {
        recipe.servings = self.servings;
        recipe.net_price = self.net_price;
    }
}

/// One field edit reported by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    /// The diner count changed
    Servings(f64),
    /// The per-serving price changed
    PricePerServing(f64),
    /// The total price was overridden directly
    NetPrice(f64),
}

/// Apply one field edit, returning the settled state.
///
/// Invariants after settling: `servings >= 1`, and whenever a per-serving
/// price is confirmed, `net_price == price_per_serving * servings`.
pub fn apply_field_edit(state: PricingState, edit: Edit) -> PricingState {
    match edit {
        Edit::Servings(servings) => {
            let servings = sanitize_servings(servings);
            match state.price_per_serving {
                // A confirmed per-serving price is the anchor: scale the
                // total to the new headcount.
                Some(price) => PricingState {
                    servings,
                    net_price: price * servings,
                    price_per_serving: Some(price),
                },
                // No price entered yet: only the headcount moves.
                None => PricingState { servings, ..state },
            }
        }
        Edit::PricePerServing(price) => {
            let price = finite_or_zero(price);
            PricingState {
                servings: state.servings,
                net_price: price * state.servings,
                price_per_serving: Some(price),
            }
        }
        Edit::NetPrice(net_price) => {
            let net_price = finite_or_zero(net_price);
            let price = if state.servings > 0.0 {
                net_price / state.servings
            } else {
                0.0
            };
            PricingState {
                servings: state.servings,
                net_price,
                price_per_serving: Some(price),
            }
        }
    }
}

fn sanitize_servings(servings: f64) -> f64 {
    let servings = finite_or_zero(servings);
    if servings < 1.0 {
        1.0
    } else {
        servings
    }
}
