//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::{EntityId, EntityPrefix};

/// Represents a Brigade project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .brigade/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let brigade_dir = current.join(".brigade");
            if brigade_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let brigade_dir = root.join(".brigade");
        if brigade_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .brigade/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    fn write_structure(root: &Path) -> Result<(), ProjectError> {
        let brigade_dir = root.join(".brigade");
        std::fs::create_dir_all(&brigade_dir)
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = brigade_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Self::create_entity_dirs(root)
    }

    fn default_config() -> &'static str {
        r#"# Brigade Project Configuration

# Default author for new entities (can be overridden by global config)
# author: ""

# Editor to use for `brigade ... edit` commands (default: $EDITOR)
# editor: ""

# Default output format (auto, yaml, tsv, json, csv, md, id)
# default_format: auto

# Restaurant-wide target food-cost percentage used for suggested prices.
# Must be in (0, 100]. Defaults to 30 when unset.
# target_food_cost_percent: 30
"#
    }

    fn create_entity_dirs(root: &Path) -> Result<(), ProjectError> {
        let dirs = ["pantry/ingredients", "recipes"];

        for dir in dirs {
            std::fs::create_dir_all(root.join(dir))
                .map_err(|e| ProjectError::IoError(e.to_string()))?;
        }

        Ok(())
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .brigade configuration directory
    pub fn brigade_dir(&self) -> PathBuf {
        self.root.join(".brigade")
    }

    /// Get the path for a new entity file
    pub fn entity_path(&self, prefix: EntityPrefix, id: &EntityId) -> PathBuf {
        let subdir = Self::entity_directory(prefix);
        self.root.join(subdir).join(format!("{}.brigade.yaml", id))
    }

    /// Get the directory for a given entity prefix
    pub fn entity_directory(prefix: EntityPrefix) -> &'static str {
        match prefix {
            EntityPrefix::Ing => "pantry/ingredients",
            EntityPrefix::Rcp => "recipes",
        }
    }

    /// Iterate all entity files of a given prefix type
    pub fn iter_entity_files(&self, prefix: EntityPrefix) -> impl Iterator<Item = PathBuf> {
        let dir = self.root.join(Self::entity_directory(prefix));
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(".brigade.yaml"))
            .map(|e| e.path().to_path_buf())
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a Brigade project (searched from {searched_from:?}). Run 'brigade init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("Brigade project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
