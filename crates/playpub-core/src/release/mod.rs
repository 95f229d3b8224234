//! Track release construction
//!
//! A [`ReleaseDescriptor`] is the release object submitted to a Play track:
//! the uploaded version codes, the rollout status and fraction, an optional
//! name and the localized release notes.

mod builder;
mod notes;

pub use builder::{resolve_rollout, ReleaseBuilder};
pub use notes::{read_localized_notes, LocaleNotesMap, WHATS_NEW_PREFIX};

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::types::ReleaseStatus;

/// Release submitted to a track, serialized in the publishing API's
/// `TrackRelease` shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDescriptor {
    /// Version codes of the artifacts in this release, in upload order
    #[serde(serialize_with = "serialize_version_codes")]
    pub version_codes: Vec<i64>,

    /// Rollout status
    pub status: ReleaseStatus,

    /// Fraction of users receiving a staged rollout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,

    /// Release name shown in the Play Console
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Release notes per locale
    #[serde(
        skip_serializing_if = "LocaleNotesMap::is_empty",
        serialize_with = "serialize_release_notes"
    )]
    pub release_notes: LocaleNotesMap,

    /// In-app update priority (0-5)
    pub in_app_update_priority: i32,
}

// int64 values travel as JSON strings in the publishing API
fn serialize_version_codes<S: Serializer>(codes: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(codes.len()))?;
    for code in codes {
        seq.serialize_element(&code.to_string())?;
    }
    seq.end()
}

#[derive(Serialize)]
struct LocalizedText<'a> {
    language: &'a str,
    text: &'a str,
}

fn serialize_release_notes<S: Serializer>(
    notes: &LocaleNotesMap,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(notes.len()))?;
    for (language, text) in notes {
        seq.serialize_element(&LocalizedText { language, text })?;
    }
    seq.end()
}
