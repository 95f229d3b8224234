//! Google Play edit-session publishing for playpub
//!
//! This crate holds the remote side of a publish run: the [`EditsApi`] seam
//! over the Play Developer Publishing API, a reqwest-backed implementation
//! of it, and the upload and orchestration logic built on top.
//!
//! ## Usage
//!
//! ```ignore
//! use playpub_publisher::google_play::{Credentials, GooglePlayClient, GooglePlayConfig};
//! use playpub_publisher::PublishOrchestrator;
//!
//! let client = GooglePlayClient::new(GooglePlayConfig::new(
//!     Credentials::ServiceAccountKey("service-account.json".into()),
//! ))?;
//! let summary = PublishOrchestrator::new(&client, &config).publish().await?;
//! println!("released version codes {:?}", summary.version_codes);
//! ```

pub mod error;
pub mod google_play;
pub mod orchestrator;
pub mod traits;
pub mod types;
pub mod uploader;

#[cfg(test)]
mod mock;

pub use error::StoreError;
pub use orchestrator::{PublishOrchestrator, PublishSummary};
pub use traits::EditsApi;
pub use uploader::{ArtifactUploader, BUNDLE_INSTALLATION_WARNING};
