//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treegrid/treegrid.toml`
//! 3. Local config: `<data_dir>/.treegrid.toml` (directory of the row file)
//! 4. Environment variables: `TREEGRID_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::OrphanPolicy;

/// Unified configuration for treegrid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Cells of indentation per tree level
    pub indent_unit: u16,
    /// Width of the toggle control
    pub toggle_width: u16,
    /// Handling of rows whose parent does not exist
    pub orphan_policy: OrphanPolicy,
    /// Levels shown expanded when a table is first displayed
    pub default_depth: usize,
    /// Domain fields shown by `treegrid show` (empty: all fields of the first row)
    pub columns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            toggle_width: 2,
            orphan_policy: OrphanPolicy::Exclude,
            default_depth: 0,
            columns: Vec::new(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub indent_unit: Option<u16>,
    pub toggle_width: Option<u16>,
    pub orphan_policy: Option<OrphanPolicy>,
    pub default_depth: Option<usize>,
    pub columns: Option<Vec<String>>,
}

/// Get the XDG config directory for treegrid.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treegrid").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treegrid.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".treegrid.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            indent_unit: overlay.indent_unit.unwrap_or(self.indent_unit),
            toggle_width: overlay.toggle_width.unwrap_or(self.toggle_width),
            orphan_policy: overlay.orphan_policy.unwrap_or(self.orphan_policy),
            default_depth: overlay.default_depth.unwrap_or(self.default_depth),
            columns: overlay
                .columns
                .clone()
                .unwrap_or_else(|| self.columns.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_dir` - Optional directory holding the row file (for local config)
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = data_dir.map(local_config_path).filter(|p| p.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Layered load from explicit file locations; missing layers are skipped.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(path) = global {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 3. Local config next to the data
        if let Some(path) = local {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply TREEGRID_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEGRID")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("columns")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value::<u16>(&config, "indent_unit")? {
            settings.indent_unit = val;
        }
        if let Some(val) = env_value::<u16>(&config, "toggle_width")? {
            settings.toggle_width = val;
        }
        if let Some(val) = env_value::<String>(&config, "orphan_policy")? {
            settings.orphan_policy = val
                .parse::<OrphanPolicy>()
                .map_err(|e| ApplicationError::Config {
                    message: format!("TREEGRID_ORPHAN_POLICY: {e}"),
                })?;
        }
        if let Some(val) = env_value::<usize>(&config, "default_depth")? {
            settings.default_depth = val;
        }
        if let Some(val) = env_value::<Vec<String>>(&config, "columns")? {
            settings.columns = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treegrid configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treegrid/treegrid.toml
#   Local:  <data_dir>/.treegrid.toml   (next to the row file)
#   Env:    TREEGRID_* environment variables

# Cells of indentation per tree level
# indent_unit = 2

# Width of the expand/collapse control
# toggle_width = 2

# Rows whose parent id matches no row: "exclude" (hidden with subtree) or "root"
# orphan_policy = "exclude"

# Levels shown expanded on first display (0 = roots only)
# default_depth = 0

# Domain fields shown by `treegrid show` (empty = all fields of the first row)
# columns = ["description", "quantity"]
"#
        .to_string()
    }
}

/// An unset variable is `None`; a value of the wrong type is an error.
fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("TREEGRID_{}: {}", key.to_uppercase(), e),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
