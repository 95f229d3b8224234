//! Configuration types

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use super::defaults::DEFAULT_TRACK;
use crate::types::ReleaseStatus;

/// Main configuration for a publish run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Application package name (e.g. `com.example.app`)
    pub package_name: String,

    /// Path to the Google service account JSON key
    pub service_account_key: Option<PathBuf>,

    /// APK/AAB files to upload, in order
    pub app_paths: Vec<PathBuf>,

    /// Expansion file entries (`main:<path>` / `patch:<path>`), one per APK
    pub expansion_files: Vec<String>,

    /// ProGuard mapping files, one per artifact
    pub mapping_files: Vec<PathBuf>,

    /// Target track (internal, alpha, beta, production or a custom track)
    pub track: String,

    /// Release construction settings
    pub release: ReleaseConfig,

    /// Acknowledge the "bundle installation may be too large" warning
    pub ack_bundle_installation_warning: bool,

    /// Commit again without sending for review if the first commit is refused
    pub retry_without_sending_to_review: bool,

    /// Validate the edit instead of committing it
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            service_account_key: None,
            app_paths: Vec::new(),
            expansion_files: Vec::new(),
            mapping_files: Vec::new(),
            track: DEFAULT_TRACK.to_string(),
            release: ReleaseConfig::default(),
            ack_bundle_installation_warning: false,
            retry_without_sending_to_review: false,
            dry_run: false,
        }
    }
}

/// Settings consumed when building the track release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Explicit release status; derived from `user_fraction` when unset
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub status: Option<ReleaseStatus>,

    /// Staged rollout fraction, `0` for a full rollout
    pub user_fraction: f64,

    /// In-app update priority (0-5)
    pub update_priority: i32,

    /// Release name shown in the Play Console
    pub release_name: Option<String>,

    /// Directory holding `whatsnew-<locale>` files
    pub whats_new_dir: Option<PathBuf>,
}

/// Treat `status: ""` the same as an absent status
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<ReleaseStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PublishConfig::default();
        assert_eq!(config.track, "internal");
        assert!(config.release.status.is_none());
        assert_eq!(config.release.user_fraction, 0.0);
    }

    #[test]
    fn test_empty_status_deserializes_as_none() {
        let config: ReleaseConfig =
            serde_yaml::from_str("status: \"\"\nuser_fraction: 0.2").unwrap();
        assert_eq!(config.status, None);
        assert_eq!(config.user_fraction, 0.2);
    }

    #[test]
    fn test_status_uses_wire_names() {
        let config: ReleaseConfig = toml::from_str("status = \"inProgress\"").unwrap();
        assert_eq!(config.status, Some(ReleaseStatus::InProgress));

        assert!(toml::from_str::<ReleaseConfig>("status = \"paused\"").is_err());
    }
}
