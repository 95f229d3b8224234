//! End-to-end publish run against one edit session

use playpub_core::{PublishConfig, ReleaseBuilder, ReleaseStatus, Result, UploadResult};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::google_play::console_url;
use crate::traits::EditsApi;
use crate::types::Track;
use crate::uploader::{remote_error, ArtifactUploader};

/// Commit rejection text that a retry without review can get past
const CHANGES_NOT_SENT_FOR_REVIEW: &str = "changesNotSentForReview";

/// Outcome of a publish run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishSummary {
    pub package_name: String,
    pub edit_id: String,
    pub track: String,
    pub uploads: Vec<UploadResult>,
    pub version_codes: Vec<i64>,
    pub status: ReleaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_fraction: Option<f64>,
    /// `false` for a dry run, where the edit is only validated
    pub committed: bool,
    /// `false` when the commit went through with `changesNotSentForReview`
    pub sent_for_review: bool,
    pub console_url: String,
}

/// Drives uploads, track update and commit for a validated configuration
pub struct PublishOrchestrator<'a> {
    api: &'a dyn EditsApi,
    config: &'a PublishConfig,
}

impl<'a> PublishOrchestrator<'a> {
    pub fn new(api: &'a dyn EditsApi, config: &'a PublishConfig) -> Self {
        Self { api, config }
    }

    /// Run the publish.
    ///
    /// Steps run strictly in order and the first failure aborts the run.
    /// An edit that is never committed expires on the server.
    pub async fn publish(&self) -> Result<PublishSummary> {
        let package_name = self.config.package_name.as_str();

        debug!("Creating a new edit for app package name '{}'", package_name);
        let edit = self
            .api
            .insert_edit(package_name)
            .await
            .map_err(|e| remote_error("create edit", e))?;
        info!("Created edit {}", edit.id);

        let uploads = self.upload_artifacts(&edit.id).await?;
        let version_codes: Vec<i64> = uploads.iter().map(|u| u.version_code).collect();

        let release = ReleaseBuilder::new(&self.config.release).build(&version_codes)?;
        let status = release.status;
        let user_fraction = release.user_fraction;

        let track = Track {
            track: self.config.track.clone(),
            releases: vec![release],
        };
        debug!("Updating track '{}' with {} version code(s)", track.track, version_codes.len());
        self.api
            .update_track(package_name, &edit.id, &track)
            .await
            .map_err(|e| remote_error("update track", e))?;
        info!("Track {} updated", track.track);

        let (committed, sent_for_review) = if self.config.dry_run {
            self.api
                .validate_edit(package_name, &edit.id)
                .await
                .map_err(|e| remote_error("validate edit", e))?;
            info!("Edit {} validated (dry run, not committed)", edit.id);
            (false, false)
        } else {
            let sent_for_review = self.commit(&edit.id).await?;
            (true, sent_for_review)
        };

        Ok(PublishSummary {
            package_name: package_name.to_string(),
            edit_id: edit.id,
            track: track.track,
            uploads,
            version_codes,
            status,
            user_fraction,
            committed,
            sent_for_review,
            console_url: console_url(package_name),
        })
    }

    async fn upload_artifacts(&self, edit_id: &str) -> Result<Vec<UploadResult>> {
        let uploader = ArtifactUploader::new(self.api, &self.config.package_name, edit_id);
        let mut uploads = Vec::with_capacity(self.config.app_paths.len());

        for (i, path) in self.config.app_paths.iter().enumerate() {
            let upload = uploader
                .upload_artifact(path, self.config.ack_bundle_installation_warning)
                .await?;

            if let Some(entry) = self.config.expansion_files.get(i) {
                uploader.upload_expansion_file(entry, upload.version_code).await?;
            }

            if let Some(mapping) = self.config.mapping_files.get(i) {
                uploader.upload_mapping_file(upload.version_code, mapping).await?;
            }

            uploads.push(upload);
        }

        Ok(uploads)
    }

    /// Commit the edit, returning whether it was sent for review
    async fn commit(&self, edit_id: &str) -> Result<bool> {
        let package_name = self.config.package_name.as_str();

        match self.api.commit_edit(package_name, edit_id, false).await {
            Ok(edit) => {
                info!("Edit {} committed", edit.id);
                Ok(true)
            }
            Err(e)
                if self.config.retry_without_sending_to_review
                    && e.to_string().contains(CHANGES_NOT_SENT_FOR_REVIEW) =>
            {
                warn!("Commit refused ({}), retrying without sending for review", e);
                let edit = self
                    .api
                    .commit_edit(package_name, edit_id, true)
                    .await
                    .map_err(|e| remote_error("commit edit", e))?;
                info!("Edit {} committed, changes not sent for review", edit.id);
                Ok(false)
            }
            Err(e) => Err(remote_error("commit edit", e)),
        }
    }
}
