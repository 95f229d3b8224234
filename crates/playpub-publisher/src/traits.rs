//! Publishing API seam

use playpub_core::ExpansionFileType;
use tokio::fs::File;

use crate::error::Result;
use crate::types::*;

/// Edit-session operations of the Play Developer Publishing API.
///
/// Every method is one remote round-trip. Media uploads take ownership of
/// the opened file, which is released when the call returns.
#[async_trait::async_trait]
pub trait EditsApi: Send + Sync {
    /// Open a new edit for the package
    async fn insert_edit(&self, package_name: &str) -> Result<AppEdit>;

    /// Upload an Android App Bundle into the edit
    async fn upload_bundle(
        &self,
        package_name: &str,
        edit_id: &str,
        media: File,
        ack_bundle_installation_warning: bool,
    ) -> Result<Bundle>;

    /// Upload an APK into the edit
    async fn upload_apk(&self, package_name: &str, edit_id: &str, media: File) -> Result<Apk>;

    /// Upload an expansion file for an APK version code
    async fn upload_expansion_file(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        file_type: ExpansionFileType,
        media: File,
    ) -> Result<()>;

    /// Upload a deobfuscation file for a version code
    async fn upload_deobfuscation_file(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        deobfuscation_file_type: &str,
        media: File,
    ) -> Result<()>;

    /// Replace the releases of a track
    async fn update_track(&self, package_name: &str, edit_id: &str, track: &Track) -> Result<()>;

    /// Check the edit for errors without committing it
    async fn validate_edit(&self, package_name: &str, edit_id: &str) -> Result<AppEdit>;

    /// Commit the edit, publishing its changes
    async fn commit_edit(
        &self,
        package_name: &str,
        edit_id: &str,
        changes_not_sent_for_review: bool,
    ) -> Result<AppEdit>;
}
