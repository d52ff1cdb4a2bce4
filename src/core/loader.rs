//! Entity loading utilities
//!
//! This module provides generic utilities for loading entities from the
//! filesystem, reducing boilerplate in command implementations.

use miette::{IntoDiagnostic, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::identity::EntityId;
use crate::core::project::Project;
use crate::costing::RecipeSource;
use crate::entities::Recipe;

/// Load all entities of type T from a directory
///
/// Scans the directory for .yaml files and deserializes them.
/// Files that fail to parse are silently skipped.
pub fn load_all<T: DeserializeOwned + 'static>(dir: &Path) -> Result<Vec<T>> {
    let mut entities = Vec::new();

    if !dir.exists() {
        return Ok(entities);
    }

    for entry in fs::read_dir(dir).into_diagnostic()? {
        let entry = entry.into_diagnostic()?;
        let path = entry.path();

        if path.extension().map_or(false, |e| e == "yaml") {
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(entity) = serde_yml::from_str::<T>(&content) {
                    entities.push(entity);
                }
            }
        }
    }

    Ok(entities)
}

/// Find an entity file by ID (supports partial matching)
///
/// Searches for a file whose stem contains the given ID.
/// Returns the first match found.
pub fn find_entity_file(dir: &Path, id: &str) -> Option<PathBuf> {
    if !dir.exists() {
        return None;
    }

    for entry in fs::read_dir(dir).ok()? {
        let entry = entry.ok()?;
        let path = entry.path();

        if path.extension().map_or(false, |e| e == "yaml") {
            let filename = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
            if filename.contains(id) || filename.starts_with(id) {
                return Some(path);
            }
        }
    }

    None
}

/// Load a single entity by ID
///
/// Searches for an entity file matching the ID and deserializes it.
/// Returns the path and entity if found.
pub fn load_entity<T: DeserializeOwned + 'static>(dir: &Path, id: &str) -> Result<Option<(PathBuf, T)>> {
    if let Some(path) = find_entity_file(dir, id) {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        let entity: T = serde_yml::from_str(&content).into_diagnostic()?;
        return Ok(Some((path, entity)));
    }
    Ok(None)
}

/// In-memory snapshot of a project's recipes, indexed by id.
///
/// The costing engine performs no I/O mid-computation; a snapshot is taken
/// before a pass begins and handed to the aggregator as its recipe source.
#[derive(Debug, Default)]
pub struct LoadedRecipes {
    recipes: HashMap<EntityId, Recipe>,
}

impl LoadedRecipes {
    /// Load every recipe in the project's recipe directory
    pub fn load(project: &Project) -> Result<Self> {
        let mut recipes = Vec::new();
        for path in project.iter_entity_files(crate::core::EntityPrefix::Rcp) {
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(recipe) = serde_yml::from_str::<Recipe>(&content) {
                    recipes.push(recipe);
                }
            }
        }
        Ok(Self::from_recipes(recipes))
    }

    /// Build a snapshot from already-loaded recipes
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        Self {
            recipes: recipes
                .into_iter()
                .map(|r| (r.id.clone(), r))
                .collect(),
        }
    }

    /// Look up a recipe by id
    pub fn get(&self, id: &EntityId) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Iterate all loaded recipes
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Number of loaded recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeSource for LoadedRecipes {
    fn recipe(&self, id: &EntityId) -> Option<&Recipe> {
        self.recipes.get(id)
    }
}
