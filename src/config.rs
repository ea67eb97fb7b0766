//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treesel/treesel.toml`
//! 3. Local config: `<records_dir>/.treesel.toml` (next to the records file)
//! 4. Environment variables: `TREESEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Checkbox markers used when printing a tree with selection states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkerConfig {
    pub selected: String,
    pub indeterminate: String,
    pub unselected: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            selected: "[x]".into(),
            indeterminate: "[-]".into(),
            unselected: "[ ]".into(),
        }
    }
}

/// Defaults for the `filter` command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Match labels case-sensitively (default: false)
    pub case_sensitive: bool,
    /// Keep the whole subtree of a match instead of pruning its non-matching children
    pub lineage: bool,
}

/// Raw marker config for intermediate parsing (None = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawMarkerConfig {
    pub selected: Option<String>,
    pub indeterminate: Option<String>,
    pub unselected: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFilterConfig {
    pub case_sensitive: Option<bool>,
    pub lineage: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub strict: Option<bool>,
    pub show_icons: Option<bool>,
    pub markers: RawMarkerConfig,
    pub filter: RawFilterConfig,
}

/// Unified configuration for treesel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Reject duplicate ids and orphan records instead of dropping them silently
    pub strict: bool,
    /// Prefix labels with the record icon when one is set
    pub show_icons: bool,
    pub markers: MarkerConfig,
    pub filter: FilterConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strict: false,
            show_icons: true,
            markers: MarkerConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

/// Get the XDG config directory for treesel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treesel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treesel.toml"))
}

/// Get the path to the local config file in a records directory.
pub fn local_config_path(records_dir: &Path) -> PathBuf {
    records_dir.join(".treesel.toml")
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
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            strict: overlay.strict.unwrap_or(self.strict),
            show_icons: overlay.show_icons.unwrap_or(self.show_icons),
            markers: MarkerConfig {
                selected: overlay
                    .markers
                    .selected
                    .clone()
                    .unwrap_or_else(|| self.markers.selected.clone()),
                indeterminate: overlay
                    .markers
                    .indeterminate
                    .clone()
                    .unwrap_or_else(|| self.markers.indeterminate.clone()),
                unselected: overlay
                    .markers
                    .unselected
                    .clone()
                    .unwrap_or_else(|| self.markers.unselected.clone()),
            },
            filter: FilterConfig {
                case_sensitive: overlay
                    .filter
                    .case_sensitive
                    .unwrap_or(self.filter.case_sensitive),
                lineage: overlay.filter.lineage.unwrap_or(self.filter.lineage),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `records_dir` - Optional directory of the records file for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treesel/treesel.toml`
    /// 3. Local config: `<records_dir>/.treesel.toml`
    /// 4. Environment variables: `TREESEL_*` prefix
    pub fn load(records_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = records_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TREESEL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("TREESEL")
                .prefix_separator("_")
                .separator("__"),
        );
        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }
        if let Ok(val) = config.get_bool("show_icons") {
            settings.show_icons = val;
        }
        if let Ok(val) = config.get_string("markers.selected") {
            settings.markers.selected = val;
        }
        if let Ok(val) = config.get_string("markers.indeterminate") {
            settings.markers.indeterminate = val;
        }
        if let Ok(val) = config.get_string("markers.unselected") {
            settings.markers.unselected = val;
        }
        if let Ok(val) = config.get_bool("filter.case_sensitive") {
            settings.filter.case_sensitive = val;
        }
        if let Ok(val) = config.get_bool("filter.lineage") {
            settings.filter.lineage = val;
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
        r#"# treesel configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treesel/treesel.toml
#   Local:  <records_dir>/.treesel.toml
#   Env:    TREESEL_* environment variables (e.g. TREESEL_FILTER__LINEAGE=true)

# Reject duplicate ids and orphan records instead of dropping them
# strict = false

# Prefix labels with record icons
# show_icons = true

[markers]
# selected = "[x]"
# indeterminate = "[-]"
# unselected = "[ ]"

[filter]
# case_sensitive = false
# Keep the whole subtree of a match
# lineage = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
