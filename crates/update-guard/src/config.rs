use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use update_guard_check::SqlDialect;

/// Error loading a [`GuardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse guard config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the full-table update guard.
///
/// By default the guard is disabled and must be explicitly enabled, either in
/// code or through the `[update_guard]` table of a TOML file:
///
/// ```toml
/// [update_guard]
/// enable = true
/// dialect = "mysql"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Whether statements are inspected at all.
    #[serde(rename = "enable")]
    pub enabled: bool,
    /// Dialect used to parse rendered SQL.
    pub dialect: SqlDialect,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    update_guard: GuardConfig,
}

impl GuardConfig {
    /// Create a new configuration with defaults (guard disabled, generic dialect).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the guard.
    pub fn enable(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Disable the guard.
    pub fn disable(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Parse the `[update_guard]` table of a TOML document.
    ///
    /// A document without that table yields the default configuration.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(raw)?;
        Ok(file.update_guard)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}
