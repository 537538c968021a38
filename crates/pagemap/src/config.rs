// File: src/config.rs
// Purpose: Configuration parsing from pagemap.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::Conventions;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub conventions: ConventionsConfig,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory containing page files (default: "pages")
    #[serde(default = "default_pages_dir")]
    pub pages_dir: String,

    /// File extensions recognized as pages (default: ["vue", "js"])
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Overrides for the reserved filename tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionsConfig {
    #[serde(default = "default_index_stem")]
    pub index_stem: String,

    #[serde(default = "default_dynamic_prefix")]
    pub dynamic_prefix: char,

    #[serde(default = "default_catch_all_stem")]
    pub catch_all_stem: String,

    #[serde(default = "default_name_separator")]
    pub name_separator: char,
}

// Default values
fn default_pages_dir() -> String {
    "pages".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["vue".to_string(), "js".to_string()]
}

fn default_index_stem() -> String {
    "index".to_string()
}

fn default_dynamic_prefix() -> char {
    '_'
}

fn default_catch_all_stem() -> String {
    "_".to_string()
}

fn default_name_separator() -> char {
    '-'
}

// Default implementations
impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            pages_dir: default_pages_dir(),
            extensions: default_extensions(),
        }
    }
}

impl Default for ConventionsConfig {
    fn default() -> Self {
        Self {
            index_stem: default_index_stem(),
            dynamic_prefix: default_dynamic_prefix(),
            catch_all_stem: default_catch_all_stem(),
            name_separator: default_name_separator(),
        }
    }
}

impl Config {
    /// Load configuration from pagemap.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        // If file is empty, return default config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // Parse TOML
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./pagemap.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("pagemap.toml")
    }

    /// Builds the compiler conventions from this configuration
    pub fn conventions(&self) -> Conventions {
        Conventions::default()
            .with_index_stem(self.conventions.index_stem.clone())
            .with_dynamic_prefix(self.conventions.dynamic_prefix)
            .with_catch_all_stem(self.conventions.catch_all_stem.clone())
            .with_name_separator(self.conventions.name_separator)
            .with_page_extensions(self.routing.extensions.clone())
    }
}
