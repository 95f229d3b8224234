//! playpub Core - release construction for Google Play publishing
//!
//! This crate provides the domain types, error handling, configuration and
//! the pure decision logic of a publish run: parsing expansion file entries,
//! reading localized release notes and building the track release.

pub mod config;
pub mod error;
pub mod expansion;
pub mod release;
pub mod types;

pub use config::{PublishConfig, ReleaseConfig};
pub use error::{ConfigError, PublishError, Result};
pub use expansion::{parse_expansion_entry, ExpansionFileSpec, ExpansionFileType};
pub use release::{
    read_localized_notes, resolve_rollout, LocaleNotesMap, ReleaseBuilder, ReleaseDescriptor,
};
pub use types::{ArtifactKind, ReleaseStatus, UploadResult};
