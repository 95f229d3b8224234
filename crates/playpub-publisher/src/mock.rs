//! Recording in-memory [`EditsApi`] for tests

use playpub_core::ExpansionFileType;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::fs::File;

use crate::error::{Result, StoreError};
use crate::traits::EditsApi;
use crate::types::*;

pub(crate) const EDIT_ID: &str = "edit-42";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    InsertEdit,
    UploadBundle { ack: bool },
    UploadApk,
    UploadExpansionFile {
        version_code: i64,
        file_type: ExpansionFileType,
    },
    UploadDeobfuscationFile {
        version_code: i64,
        file_type: String,
    },
    UpdateTrack(Track),
    ValidateEdit,
    CommitEdit { changes_not_sent_for_review: bool },
}

/// Hands out version codes 100, 101, ... and fails where told to
pub(crate) struct MockEditsApi {
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) next_version_code: Mutex<i64>,
    pub(crate) bundle_error: Option<(u16, &'static str)>,
    pub(crate) apk_error: Option<(u16, &'static str)>,
    pub(crate) expansion_error: Option<(u16, &'static str)>,
    pub(crate) track_error: Option<(u16, &'static str)>,
    pub(crate) commit_errors: Mutex<VecDeque<(u16, &'static str)>>,
    /// Fail `insert_edit` as if the token exchange had been refused
    pub(crate) auth_failure: bool,
}

impl Default for MockEditsApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_version_code: Mutex::new(100),
            bundle_error: None,
            apk_error: None,
            expansion_error: None,
            track_error: None,
            commit_errors: Mutex::new(VecDeque::new()),
            auth_failure: false,
        }
    }
}

impl MockEditsApi {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn version_code(&self) -> i64 {
        let mut next = self.next_version_code.lock().unwrap();
        let code = *next;
        *next += 1;
        code
    }
}

fn fail(error: Option<(u16, &'static str)>) -> Result<()> {
    match error {
        Some((status, message)) => Err(StoreError::ApiError {
            status,
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

#[async_trait::async_trait]
impl EditsApi for MockEditsApi {
    async fn insert_edit(&self, _package_name: &str) -> Result<AppEdit> {
        self.record(Call::InsertEdit);
        if self.auth_failure {
            return Err(StoreError::AuthenticationFailed(
                "invalid_grant: Invalid JWT Signature.".to_string(),
            ));
        }
        Ok(AppEdit {
            id: EDIT_ID.to_string(),
            expiry_time_seconds: None,
        })
    }

    async fn upload_bundle(
        &self,
        _package_name: &str,
        _edit_id: &str,
        _media: File,
        ack_bundle_installation_warning: bool,
    ) -> Result<Bundle> {
        self.record(Call::UploadBundle {
            ack: ack_bundle_installation_warning,
        });
        fail(self.bundle_error)?;
        Ok(Bundle {
            version_code: self.version_code(),
            sha1: None,
            sha256: None,
        })
    }

    async fn upload_apk(&self, _package_name: &str, _edit_id: &str, _media: File) -> Result<Apk> {
        self.record(Call::UploadApk);
        fail(self.apk_error)?;
        Ok(Apk {
            version_code: self.version_code(),
            binary: None,
        })
    }

    async fn upload_expansion_file(
        &self,
        _package_name: &str,
        _edit_id: &str,
        version_code: i64,
        file_type: ExpansionFileType,
        _media: File,
    ) -> Result<()> {
        self.record(Call::UploadExpansionFile {
            version_code,
            file_type,
        });
        fail(self.expansion_error)
    }

    async fn upload_deobfuscation_file(
        &self,
        _package_name: &str,
        _edit_id: &str,
        version_code: i64,
        deobfuscation_file_type: &str,
        _media: File,
    ) -> Result<()> {
        self.record(Call::UploadDeobfuscationFile {
            version_code,
            file_type: deobfuscation_file_type.to_string(),
        });
        Ok(())
    }

    async fn update_track(&self, _package_name: &str, _edit_id: &str, track: &Track) -> Result<()> {
        self.record(Call::UpdateTrack(track.clone()));
        fail(self.track_error)
    }

    async fn validate_edit(&self, _package_name: &str, edit_id: &str) -> Result<AppEdit> {
        self.record(Call::ValidateEdit);
        Ok(AppEdit {
            id: edit_id.to_string(),
            expiry_time_seconds: None,
        })
    }

    async fn commit_edit(
        &self,
        _package_name: &str,
        edit_id: &str,
        changes_not_sent_for_review: bool,
    ) -> Result<AppEdit> {
        self.record(Call::CommitEdit {
            changes_not_sent_for_review,
        });
        let next_error = self.commit_errors.lock().unwrap().pop_front();
        fail(next_error)?;
        Ok(AppEdit {
            id: edit_id.to_string(),
            expiry_time_seconds: None,
        })
    }
}
