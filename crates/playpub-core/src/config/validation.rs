//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::expansion::parse_expansion_entry;
use crate::types::ArtifactKind;

use super::defaults::MAX_UPDATE_PRIORITY;
use super::types::PublishConfig;

/// Validate configuration
pub fn validate_config(config: &PublishConfig) -> Result<()> {
    debug!("validating configuration");
    validate_package(config)?;
    validate_artifacts(config)?;
    validate_release(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_package(config: &PublishConfig) -> Result<()> {
    if config.package_name.trim().is_empty() {
        return Err(ConfigError::MissingField("package_name".to_string()).into());
    }

    if config.track.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "track".to_string(),
            message: "track cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_artifacts(config: &PublishConfig) -> Result<()> {
    if config.app_paths.is_empty() {
        return Err(ConfigError::MissingField("app_paths".to_string()).into());
    }

    let mut kinds = Vec::with_capacity(config.app_paths.len());
    for (i, path) in config.app_paths.iter().enumerate() {
        let kind = ArtifactKind::from_path(path).ok_or_else(|| ConfigError::InvalidValue {
            field: format!("app_paths[{}]", i),
            message: format!("{} is neither an .apk nor an .aab file", path.display()),
        })?;
        kinds.push(kind);
    }

    if !config.expansion_files.is_empty() {
        if kinds.iter().any(|k| *k != ArtifactKind::Apk) {
            return Err(ConfigError::InvalidValue {
                field: "expansion_files".to_string(),
                message: "expansion files can only be uploaded alongside APKs".to_string(),
            }
            .into());
        }

        if config.expansion_files.len() != config.app_paths.len() {
            return Err(ConfigError::InvalidValue {
                field: "expansion_files".to_string(),
                message: format!(
                    "got {} expansion file(s) for {} APK(s), counts must match",
                    config.expansion_files.len(),
                    config.app_paths.len()
                ),
            }
            .into());
        }

        for entry in &config.expansion_files {
            parse_expansion_entry(entry)?;
        }
    }

    if config.mapping_files.len() > config.app_paths.len() {
        return Err(ConfigError::InvalidValue {
            field: "mapping_files".to_string(),
            message: format!(
                "got {} mapping file(s) for {} artifact(s)",
                config.mapping_files.len(),
                config.app_paths.len()
            ),
        }
        .into());
    }

    Ok(())
}

fn validate_release(config: &PublishConfig) -> Result<()> {
    let fraction = config.release.user_fraction;
    if !(0.0..=1.0).contains(&fraction) {
        return Err(ConfigError::InvalidValue {
            field: "release.user_fraction".to_string(),
            message: format!("must be between 0 and 1, got {}", fraction),
        }
        .into());
    }

    let priority = config.release.update_priority;
    if !(0..=MAX_UPDATE_PRIORITY).contains(&priority) {
        return Err(ConfigError::InvalidValue {
            field: "release.update_priority".to_string(),
            message: format!("must be between 0 and {}, got {}", MAX_UPDATE_PRIORITY, priority),
        }
        .into());
    }

    Ok(())
}
