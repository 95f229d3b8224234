//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::PublishConfig;

/// Load configuration from a file.
///
/// The result is not validated: command-line overrides are usually merged
/// in first, then [`super::validate_config`] runs on the final value.
pub fn load_config(path: &Path) -> Result<PublishConfig> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: PublishConfig = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `playpub.toml`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/playpub.toml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.exists() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration or use defaults when no file exists.
///
/// A file that exists but fails to parse is still an error.
pub fn load_config_or_default(dir: &Path) -> Result<(PublishConfig, Option<PathBuf>)> {
    match find_config(dir) {
        Some(path) => {
            let config = load_config(&path)?;
            Ok((config, Some(path)))
        }
        None => {
            info!(dir = %dir.display(), "no config file found, using defaults");
            Ok((PublishConfig::default(), None))
        }
    }
}

/// Split a list input on `|` or newlines, dropping blank items.
///
/// CI inputs pass lists as a single string, e.g. `app.aab|lite.aab`.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(['|', '\n'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
