//! # Configuration
//!
//! flatdb configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `FLATDB_ROOT`, `FLATDB_LOG`.
//! 2. **Config file**: `flatdb.toml` in the working directory, or the path given to [`FlatDbConfig::load`].
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! The library itself only needs a root directory; `log_level` is read by the
//! CLI when it installs its tracing subscriber.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `root` | `data` | Root directory of the store |
//! | `log_level` | `warn` | Tracing filter used when `RUST_LOG` is unset |

use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "flatdb.toml";

/// Configuration for flatdb, stored in `flatdb.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlatDbConfig {
    /// Root directory of the store. Created on open if missing.
    #[config(env = "FLATDB_ROOT", default = "data")]
    pub root: PathBuf,

    /// Default tracing filter (e.g. "warn", "info", "flatdb=debug").
    #[config(env = "FLATDB_LOG", default = "warn")]
    pub log_level: String,
}

impl Default for FlatDbConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            log_level: "warn".to_string(),
        }
    }
}

impl FlatDbConfig {
    /// Loads env vars, then `file` (or `flatdb.toml`), then defaults.
    /// A missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self, confique::Error> {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Self::builder().env().file(file).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FlatDbConfig::default();
        assert_eq!(config.root, PathBuf::from("data"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flatdb.toml");
        let config = FlatDbConfig {
            root: PathBuf::from("/var/lib/catalog"),
            log_level: "debug".to_string(),
        };
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        let loaded = FlatDbConfig::load(Some(&path)).unwrap();
        if std::env::var_os("FLATDB_ROOT").is_none() {
            assert_eq!(loaded.root, PathBuf::from("/var/lib/catalog"));
        }
        if std::env::var_os("FLATDB_LOG").is_none() {
            assert_eq!(loaded.log_level, "debug");
        }
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = FlatDbConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        if std::env::var_os("FLATDB_ROOT").is_none() {
            assert_eq!(loaded.root, PathBuf::from("data"));
        }
    }
}
