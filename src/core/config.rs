//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Project;

/// Restaurant-wide fallback when no target food-cost percentage is configured
pub const DEFAULT_TARGET_FOOD_COST_PERCENT: f64 = 30.0;

/// Brigade configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author for new entities
    pub author: Option<String>,

    /// Editor command for `brigade ... edit`
    pub editor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Target food-cost percentage for suggested prices, in (0, 100]
    pub target_food_cost_percent: Option<f64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/brigade/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.brigade/config.yaml)
        if let Ok(project) = Project::discover() {
            let project_config_path = project.brigade_dir().join("config.yaml");
            if project_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                    if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(project_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("BRIGADE_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(editor) = std::env::var("BRIGADE_EDITOR") {
            config.editor = Some(editor);
        }
        if let Ok(target) = std::env::var("BRIGADE_TARGET_FOOD_COST") {
            if let Ok(value) = target.parse::<f64>() {
                config.target_food_cost_percent = Some(value);
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "brigade")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.target_food_cost_percent.is_some() {
            self.target_food_cost_percent = other.target_food_cost_percent;
        }
    }

    /// Get the target food-cost percentage, falling back to the default.
    ///
    /// Values outside (0, 100] are treated as absent so a misconfigured
    /// setting can never break costing.
    pub fn target_food_cost_percent(&self) -> f64 {
        match self.target_food_cost_percent {
            Some(value) if value > 0.0 && value <= 100.0 && value.is_finite() => value,
            _ => DEFAULT_TARGET_FOOD_COST_PERCENT,
        }
    }

    /// Build the costing configuration injected into the engine
    pub fn costing(&self) -> crate::costing::CostingConfig {
        crate::costing::CostingConfig::with_target(self.target_food_cost_percent())
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(
        &self,
        file_path: &std::path::Path,
    ) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        if parts.is_empty() {
            return std::process::Command::new("vi").arg(file_path).status();
        }

        let cmd = parts[0];
        let args = &parts[1..];

        std::process::Command::new(cmd)
            .args(args)
            .arg(file_path)
            .status()
    }
}
