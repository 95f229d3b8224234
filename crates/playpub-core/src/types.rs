//! Core types for playpub

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Status of a release on a Play track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseStatus {
    /// Rolled out to every user of the track
    Completed,
    /// Staged rollout to a fraction of users
    InProgress,
    /// Not yet available to users
    Draft,
    /// Staged rollout that has been paused
    Halted,
}

impl ReleaseStatus {
    /// Returns the wire representation used by the publishing API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "inProgress",
            Self::Draft => "draft",
            Self::Halted => "halted",
        }
    }

    /// Whether a rollout fraction may be attached to a release with this status
    pub fn accepts_user_fraction(&self) -> bool {
        matches!(self, Self::InProgress | Self::Halted)
    }
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "inProgress" => Ok(Self::InProgress),
            "draft" => Ok(Self::Draft),
            "halted" => Ok(Self::Halted),
            _ => Err(format!(
                "Unknown release status: {} (expected completed, inProgress, draft or halted)",
                s
            )),
        }
    }
}

/// Kind of binary artifact uploaded to an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Android package
    Apk,
    /// Android App Bundle
    Aab,
}

impl ArtifactKind {
    /// Returns the lowercase file extension for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apk => "apk",
            Self::Aab => "aab",
        }
    }

    /// Detect the artifact kind from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "apk" => Some(Self::Apk),
            "aab" => Some(Self::Aab),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a successful artifact upload.
///
/// The version code is authoritative for every later expansion-file and
/// mapping-file upload tied to this artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub version_code: i64,
    pub artifact_kind: ArtifactKind,
}
