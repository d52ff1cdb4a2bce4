//! Brigade: restaurant back-office toolkit
//!
//! Manages ingredients and recipes as plain text YAML files under git
//! version control, with a pure costing engine for food-cost analysis.

pub mod cli;
pub mod core;
pub mod costing;
pub mod entities;
