//! Configuration management for ecdeps

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// How the external search tool is invoked
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Search executable (EasyBuild's `eb`)
    #[serde(default = "default_command")]
    pub command: String,

    /// Extra arguments appended to every search
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Directories holding EasyConfigs, passed as `--robot-paths`
    #[serde(default)]
    pub robot_paths: Vec<PathBuf>,

    /// Search by name only instead of name and version
    #[serde(default)]
    pub name_only: bool,
}

fn default_command() -> String {
    "eb".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            extra_args: vec![],
            robot_paths: vec![],
            name_only: false,
        }
    }
}

/// Values from the command line or environment that override the config file
#[derive(Debug, Clone, Default)]
pub struct SearchOverrides {
    pub command: Option<String>,
    pub robot_paths: Vec<PathBuf>,
    pub name_only: bool,
}

impl Config {
    /// Load configuration from file, or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).or_else(|| {
            // Try system config
            let system_config = PathBuf::from("/etc/ecdeps/ecdeps.conf");
            if system_config.exists() {
                return Some(system_config);
            }

            // Try user config
            directories::ProjectDirs::from("org", "easybuilders", "ecdeps")
                .map(|d| d.config_dir().join("ecdeps.conf"))
                .filter(|p| p.exists())
        });

        match config_path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))
            }
            None => Ok(Config::default()),
        }
    }

    /// Apply command-line and environment overrides
    pub fn with_overrides(mut self, overrides: SearchOverrides) -> Self {
        if let Some(command) = overrides.command {
            self.search.command = command;
        }
        if !overrides.robot_paths.is_empty() {
            self.search.robot_paths = overrides.robot_paths;
        }
        self.search.name_only |= overrides.name_only;
        self
    }
}
