//! Artifact uploads into an edit session
//!
//! Each operation is single-shot: it opens its file right before the remote
//! call, and the handle is dropped when the call returns.

use playpub_core::{parse_expansion_entry, ArtifactKind, PublishError, Result, UploadResult};
use std::path::Path;
use tokio::fs::File;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::traits::EditsApi;
use crate::types::PROGUARD_DEOBFUSCATION_TYPE;

/// Remote error text returned when a bundle needs the installation warning acknowledged
pub const BUNDLE_INSTALLATION_WARNING: &str = "Error 403: The installation of the app bundle \
may be too large and trigger user warning on some devices, and this needs to be explicitly \
acknowledged in the request.";

const BUNDLE_INSTALLATION_WARNING_HINT: &str = "To acknowledge this warning, set the \
Acknowledge Bundle Installation Warning (ack_bundle_installation_warning) input to true.";

/// Wrap a failed publishing API call.
///
/// Only an error answered by the service counts as a rejection. Transport,
/// token and local IO failures are reported as the service being unavailable.
pub(crate) fn remote_error(action: &str, err: StoreError) -> PublishError {
    let message = format!("failed to {}, error: {}", action, err);
    match err {
        StoreError::ApiError { .. } => PublishError::RemoteRejected(message),
        _ => PublishError::RemoteUnavailable(message),
    }
}

/// Uploads artifacts and their companion files into one edit
pub struct ArtifactUploader<'a> {
    api: &'a dyn EditsApi,
    package_name: &'a str,
    edit_id: &'a str,
}

impl<'a> ArtifactUploader<'a> {
    pub fn new(api: &'a dyn EditsApi, package_name: &'a str, edit_id: &'a str) -> Self {
        Self {
            api,
            package_name,
            edit_id,
        }
    }

    /// Upload an APK or AAB, picking the endpoint from the file extension
    pub async fn upload_artifact(
        &self,
        path: &Path,
        ack_bundle_installation_warning: bool,
    ) -> Result<UploadResult> {
        match ArtifactKind::from_path(path) {
            Some(ArtifactKind::Aab) => {
                self.upload_bundle(path, ack_bundle_installation_warning).await
            }
            Some(ArtifactKind::Apk) => self.upload_apk(path).await,
            None => Err(PublishError::invalid_config(format!(
                "unsupported app file (expected .apk or .aab): {}",
                path.display()
            ))),
        }
    }

    /// Upload an Android App Bundle.
    ///
    /// A rejection carrying the installation-warning text gets a hint on how
    /// to acknowledge it appended to the message.
    pub async fn upload_bundle(
        &self,
        path: &Path,
        ack_bundle_installation_warning: bool,
    ) -> Result<UploadResult> {
        let media = open(path, "app bundle").await?;
        debug!(
            "Uploading file {} with package name '{}', AppEditId '{}'",
            path.display(),
            self.package_name,
            self.edit_id
        );

        let bundle = self
            .api
            .upload_bundle(
                self.package_name,
                self.edit_id,
                media,
                ack_bundle_installation_warning,
            )
            .await
            .map_err(|e| {
                let needs_hint = e.to_string().contains(BUNDLE_INSTALLATION_WARNING);
                match remote_error("upload app bundle", e) {
                    PublishError::RemoteRejected(mut message) if needs_hint => {
                        message.push('\n');
                        message.push_str(BUNDLE_INSTALLATION_WARNING_HINT);
                        PublishError::RemoteRejected(message)
                    }
                    other => other,
                }
            })?;

        info!("Uploaded app bundle version: {}", bundle.version_code);
        Ok(UploadResult {
            version_code: bundle.version_code,
            artifact_kind: ArtifactKind::Aab,
        })
    }

    /// Upload an APK
    pub async fn upload_apk(&self, path: &Path) -> Result<UploadResult> {
        let media = open(path, "apk").await?;
        debug!(
            "Uploading file {} with package name '{}', AppEditId '{}'",
            path.display(),
            self.package_name,
            self.edit_id
        );

        let apk = self
            .api
            .upload_apk(self.package_name, self.edit_id, media)
            .await
            .map_err(|e| remote_error("upload apk", e))?;

        info!("Uploaded apk version: {}", apk.version_code);
        Ok(UploadResult {
            version_code: apk.version_code,
            artifact_kind: ArtifactKind::Apk,
        })
    }

    /// Upload the expansion file described by a `main:<path>` / `patch:<path>` entry.
    ///
    /// The entry is validated before the file is touched.
    pub async fn upload_expansion_file(&self, entry: &str, version_code: i64) -> Result<()> {
        let spec = parse_expansion_entry(entry)?;
        let media = open(&spec.path, "expansion file").await?;
        debug!(
            "Uploading expansion file {} with package name '{}', AppEditId '{}', version code '{}'",
            spec.path.display(),
            self.package_name,
            self.edit_id,
            version_code
        );

        self.api
            .upload_expansion_file(
                self.package_name,
                self.edit_id,
                version_code,
                spec.file_type,
                media,
            )
            .await
            .map_err(|e| remote_error("upload expansion file", e))?;

        info!("Uploaded expansion file {}", spec.path.display());
        Ok(())
    }

    /// Upload a ProGuard mapping file for a version code
    pub async fn upload_mapping_file(&self, version_code: i64, path: &Path) -> Result<()> {
        debug!("Getting mapping file from {}", path.display());
        let media = open(path, "mapping file").await?;
        debug!(
            "Uploading mapping file {} with package name '{}', AppEditId '{}', version code '{}'",
            path.display(),
            self.package_name,
            self.edit_id,
            version_code
        );

        self.api
            .upload_deobfuscation_file(
                self.package_name,
                self.edit_id,
                version_code,
                PROGUARD_DEOBFUSCATION_TYPE,
                media,
            )
            .await
            .map_err(|e| remote_error("upload mapping file", e))?;

        info!("Uploaded mapping file for apk version: {}", version_code);
        Ok(())
    }
}

async fn open(path: &Path, what: &str) -> Result<File> {
    File::open(path).await.map_err(|e| {
        PublishError::io(format!("failed to read {} ({})", what, path.display()), e)
    })
}
