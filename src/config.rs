//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeload/treeload.toml`
//! 3. Local config: `<dir>/.treeload.toml`
//! 4. Environment variables: `TREELOAD_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::DEFAULT_ORDER;
use crate::application::ApplicationError;
use crate::domain::{LoadMode, PathCodec, DEFAULT_DELIMITER, DEFAULT_PAGE_SIZE};

/// Raw settings for intermediate parsing (all fields optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub load_mode: Option<LoadMode>,
    pub path_delimiter: Option<char>,
    pub default_order: Option<String>,
    pub page_size: Option<usize>,
    pub data_file: Option<PathBuf>,
}

/// Unified configuration for treeload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Whole subtrees (`sync`) or one level per request (`async`)
    pub load_mode: LoadMode,
    /// Character separating ancestor ids in materialized paths
    pub path_delimiter: char,
    /// Order applied when a query carries none
    pub default_order: String,
    /// Page size applied when a query carries none
    pub page_size: usize,
    /// JSON node file backing the in-memory data source
    pub data_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            load_mode: LoadMode::Sync,
            path_delimiter: DEFAULT_DELIMITER,
            default_order: DEFAULT_ORDER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            data_file: None,
        }
    }
}

/// Get the XDG config directory for treeload.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeload").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeload.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treeload.toml")
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
    pub fn codec(&self) -> PathCodec {
        PathCodec::new(self.path_delimiter)
    }

    /// Expand shell variables and tilde in `data_file`.
    fn expand_paths(&mut self) {
        if let Some(file) = &self.data_file {
            let expanded = shellexpand::full(file.to_string_lossy().as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| file.to_string_lossy().into_owned());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            load_mode: overlay.load_mode.unwrap_or(self.load_mode),
            path_delimiter: overlay.path_delimiter.unwrap_or(self.path_delimiter),
            default_order: overlay
                .default_order
                .clone()
                .unwrap_or_else(|| self.default_order.clone()),
            page_size: overlay.page_size.unwrap_or(self.page_size),
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treeload.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply TREELOAD_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREELOAD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("load_mode") {
            settings.load_mode = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("path_delimiter") {
            settings.path_delimiter = single_char(&val)?;
        }
        if let Ok(val) = config.get_string("default_order") {
            settings.default_order = val;
        }
        if let Ok(val) = config.get_string("page_size") {
            settings.page_size = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("page_size '{val}': {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Reject settings the loader cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.path_delimiter.is_alphanumeric() || self.path_delimiter.is_whitespace() {
            return Err(ApplicationError::Config {
                message: format!(
                    "path_delimiter '{}' must be a punctuation character",
                    self.path_delimiter
                ),
            });
        }
        if self.page_size == 0 {
            return Err(ApplicationError::Config {
                message: "page_size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treeload configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treeload/treeload.toml
#   Local:  <dir>/.treeload.toml
#   Env:    TREELOAD_* environment variables

# "sync" delivers whole subtrees, "async" one level per request
# load_mode = "sync"

# Character separating ancestor ids in node paths
# path_delimiter = "/"

# Order used when a query has none: "<field> [asc|desc], ..."
# default_order = "sort"

# page_size = 20

# JSON array of nodes
# data_file = "~/data/nodes.json"
"#
        .to_string()
    }
}

fn single_char(val: &str) -> Result<char, ApplicationError> {
    let mut chars = val.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ApplicationError::Config {
            message: format!("path_delimiter must be a single character, got '{val}'"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
