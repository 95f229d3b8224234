//! Expansion file (OBB) config entries
//!
//! Entries take the form `main:<path>` or `patch:<path>`, one per APK.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::error::{PublishError, Result};

/// Expansion file slot on the Play Store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionFileType {
    Main,
    Patch,
}

impl ExpansionFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Patch => "patch",
        }
    }
}

impl std::fmt::Display for ExpansionFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated expansion file entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionFileSpec {
    pub file_type: ExpansionFileType,
    pub path: PathBuf,
}

impl std::str::FromStr for ExpansionFileSpec {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        parse_expansion_entry(s)
    }
}

/// Parse a raw `<type>:<path>` entry.
///
/// The entry is trimmed first. The type must be exactly `main` or `patch`;
/// everything after the first colon (colons included) is the path, trimmed.
pub fn parse_expansion_entry(entry: &str) -> Result<ExpansionFileSpec> {
    let clean = entry.trim();

    let Some((type_segment, rest)) = clean.split_once(':') else {
        return Err(PublishError::invalid_config(format!(
            "invalid expansion file config: {}",
            entry
        )));
    };

    let file_type = match type_segment {
        "main" => ExpansionFileType::Main,
        "patch" => ExpansionFileType::Patch,
        _ => {
            return Err(PublishError::invalid_config(format!(
                "invalid expansion file config: {}",
                entry
            )))
        }
    };
    debug!("Expansion file type is {}", file_type);

    let path = rest.trim();
    debug!("Expansion file path is {}", path);

    Ok(ExpansionFileSpec {
        file_type,
        path: PathBuf::from(path),
    })
}
