//! Inputs shared by the publish and check commands

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Args;
use tracing::debug;

use playpub_core::config::{load_config, load_config_or_default, split_list, validate_config};
use playpub_core::{ConfigError, PublishConfig, ReleaseStatus};

/// Publish inputs. Each one overrides the configuration file.
///
/// List inputs take several values separated by `|` or newlines.
#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Configuration file (defaults to playpub.toml/.yaml searched upwards)
    #[arg(long, env = "PLAYPUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Application package name
    #[arg(long, env = "PLAYPUB_PACKAGE_NAME")]
    pub package_name: Option<String>,

    /// Path to the service account JSON key
    #[arg(long, env = "PLAYPUB_SERVICE_ACCOUNT_KEY")]
    pub service_account_key: Option<PathBuf>,

    /// APK/AAB files to upload
    #[arg(long, env = "PLAYPUB_APP_PATHS")]
    pub app_paths: Option<String>,

    /// Expansion files, one `main:<path>` or `patch:<path>` entry per APK
    #[arg(long, env = "PLAYPUB_EXPANSION_FILES")]
    pub expansion_files: Option<String>,

    /// ProGuard mapping files, one per artifact
    #[arg(long, env = "PLAYPUB_MAPPING_FILES")]
    pub mapping_files: Option<String>,

    /// Release track (internal, alpha, beta, production or a custom track)
    #[arg(long, env = "PLAYPUB_TRACK")]
    pub track: Option<String>,

    /// Release status (completed, inProgress, draft, halted)
    #[arg(long, env = "PLAYPUB_STATUS")]
    pub status: Option<String>,

    /// Staged rollout fraction (0.0-1.0)
    #[arg(long, env = "PLAYPUB_USER_FRACTION")]
    pub user_fraction: Option<String>,

    /// In-app update priority (0-5)
    #[arg(long, env = "PLAYPUB_UPDATE_PRIORITY")]
    pub update_priority: Option<String>,

    /// Release name
    #[arg(long, env = "PLAYPUB_RELEASE_NAME")]
    pub release_name: Option<String>,

    /// Directory containing whatsnew-<locale> files
    #[arg(long, env = "PLAYPUB_WHATS_NEW_DIR")]
    pub whats_new_dir: Option<PathBuf>,

    /// Acknowledge the bundle installation size warning
    #[arg(long, env = "PLAYPUB_ACK_BUNDLE_INSTALLATION_WARNING")]
    pub ack_bundle_installation_warning: bool,

    /// Commit without sending for review if the first commit is refused
    #[arg(long, env = "PLAYPUB_RETRY_WITHOUT_SENDING_TO_REVIEW")]
    pub retry_without_sending_to_review: bool,
}

impl PublishArgs {
    /// Load the configuration file, apply these inputs on top and validate
    pub fn resolve(&self, cwd: &Path) -> playpub_core::Result<(PublishConfig, Option<PathBuf>)> {
        let (mut config, config_path) = match &self.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path).into());
                }
                (load_config(&path)?, Some(path))
            }
            None => load_config_or_default(cwd)?,
        };

        self.apply(&mut config)?;
        debug!(?config, "resolved configuration");
        validate_config(&config)?;
        Ok((config, config_path))
    }

    fn apply(&self, config: &mut PublishConfig) -> playpub_core::Result<()> {
        if let Some(package_name) = non_empty(&self.package_name) {
            config.package_name = package_name.to_string();
        }
        if let Some(key) = &self.service_account_key {
            if !key.as_os_str().is_empty() {
                config.service_account_key = Some(key.clone());
            }
        }
        if let Some(paths) = non_empty(&self.app_paths) {
            config.app_paths = split_list(paths).into_iter().map(PathBuf::from).collect();
        }
        if let Some(entries) = non_empty(&self.expansion_files) {
            config.expansion_files = split_list(entries);
        }
        if let Some(paths) = non_empty(&self.mapping_files) {
            config.mapping_files = split_list(paths).into_iter().map(PathBuf::from).collect();
        }
        if let Some(track) = non_empty(&self.track) {
            config.track = track.to_string();
        }
        if let Some(status) = non_empty(&self.status) {
            let status: ReleaseStatus =
                status.parse().map_err(|e: String| ConfigError::InvalidValue {
                    field: "status".to_string(),
                    message: e,
                })?;
            config.release.status = Some(status);
        }
        if let Some(fraction) = non_empty(&self.user_fraction) {
            config.release.user_fraction = parse_number("user_fraction", fraction)?;
        }
        if let Some(priority) = non_empty(&self.update_priority) {
            config.release.update_priority = parse_number("update_priority", priority)?;
        }
        if let Some(name) = non_empty(&self.release_name) {
            config.release.release_name = Some(name.to_string());
        }
        if let Some(dir) = &self.whats_new_dir {
            if !dir.as_os_str().is_empty() {
                config.release.whats_new_dir = Some(dir.clone());
            }
        }
        config.ack_bundle_installation_warning |= self.ack_bundle_installation_warning;
        config.retry_without_sending_to_review |= self.retry_without_sending_to_review;
        Ok(())
    }
}

// CI runners pass unset inputs as empty strings
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        message: format!("{} is not a number: {}", value, e),
    })
}
