//! Publishing API resource types

use playpub_core::ReleaseDescriptor;
use serde::{Deserialize, Serialize};

/// An edit session: a server-side transaction staging changes to an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEdit {
    /// Opaque edit identifier
    pub id: String,

    /// Seconds since epoch at which the edit expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time_seconds: Option<String>,
}

/// An uploaded Android App Bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub version_code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// An uploaded APK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apk {
    pub version_code: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<ApkBinary>,
}

/// Hashes of an uploaded APK
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApkBinary {
    #[serde(default)]
    pub sha1: Option<String>,

    #[serde(default)]
    pub sha256: Option<String>,
}

/// Track update body: the releases a track should carry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub track: String,
    pub releases: Vec<ReleaseDescriptor>,
}

/// Deobfuscation file type for ProGuard/R8 mapping files
pub const PROGUARD_DEOBFUSCATION_TYPE: &str = "proguard";
