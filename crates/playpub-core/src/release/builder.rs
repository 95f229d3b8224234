//! Release descriptor construction

use std::collections::HashSet;
use tracing::{debug, info};

use super::notes::{read_localized_notes, LocaleNotesMap};
use super::ReleaseDescriptor;
use crate::config::ReleaseConfig;
use crate::error::{PublishError, Result};
use crate::types::ReleaseStatus;

/// Decide the final status and the fraction attached to it.
///
/// An explicit status is used verbatim. Without one, a non-zero fraction
/// means a staged rollout (`inProgress`), otherwise `completed`. The
/// fraction is only kept for `inProgress` and `halted`; for `completed`
/// and `draft` it is dropped without error, as Play rejects it there.
pub fn resolve_rollout(
    status: Option<ReleaseStatus>,
    user_fraction: f64,
) -> (ReleaseStatus, Option<f64>) {
    let status = status.unwrap_or(if user_fraction != 0.0 {
        ReleaseStatus::InProgress
    } else {
        ReleaseStatus::Completed
    });

    let fraction =
        (status.accepts_user_fraction() && user_fraction != 0.0).then_some(user_fraction);
    (status, fraction)
}

/// Builds the release submitted to a track
#[derive(Debug, Clone, Copy)]
pub struct ReleaseBuilder<'a> {
    config: &'a ReleaseConfig,
}

impl<'a> ReleaseBuilder<'a> {
    pub fn new(config: &'a ReleaseConfig) -> Self {
        Self { config }
    }

    /// Build a release for the given version codes.
    ///
    /// Release notes are read from `whats_new_dir` when one is configured;
    /// a read failure is returned as [`PublishError::BuildFailure`].
    pub fn build(&self, version_codes: &[i64]) -> Result<ReleaseDescriptor> {
        validate_version_codes(version_codes)?;
        info!("Release version codes are: {:?}", version_codes);

        let (status, user_fraction) =
            resolve_rollout(self.config.status, self.config.user_fraction);
        if self.config.status.is_none() && status == ReleaseStatus::InProgress {
            info!(
                "Release is a staged rollout, {} of users will receive it.",
                self.config.user_fraction
            );
        }
        if user_fraction.is_none() && self.config.user_fraction != 0.0 {
            debug!(
                "user fraction {} not applied to a {} release",
                self.config.user_fraction,
                status
            );
        }

        let name = self
            .config
            .release_name
            .as_ref()
            .filter(|name| !name.is_empty())
            .cloned();

        let release_notes = self
            .read_release_notes()
            .map_err(|e| PublishError::BuildFailure(Box::new(e)))?;

        Ok(ReleaseDescriptor {
            version_codes: version_codes.to_vec(),
            status,
            user_fraction,
            name,
            release_notes,
            in_app_update_priority: self.config.update_priority,
        })
    }

    fn read_release_notes(&self) -> Result<LocaleNotesMap> {
        let dir = match &self.config.whats_new_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => return Ok(LocaleNotesMap::new()),
        };

        debug!("Checking if updating listing is required, whats new dir is '{}'", dir.display());
        info!("Update listing started");
        let notes = read_localized_notes(dir).map_err(|e| match e {
            PublishError::Io { context, source } => PublishError::Io {
                context: format!("failed to read whatsnews, {}", context),
                source,
            },
            other => other,
        })?;
        info!("Update listing finished");
        Ok(notes)
    }
}

fn validate_version_codes(version_codes: &[i64]) -> Result<()> {
    if version_codes.is_empty() {
        return Err(PublishError::invalid_config(
            "a release needs at least one version code",
        ));
    }

    let mut seen = HashSet::with_capacity(version_codes.len());
    for code in version_codes {
        if !seen.insert(code) {
            return Err(PublishError::invalid_config(format!(
                "version code {} appears more than once in the release",
                code
            )));
        }
    }
    Ok(())
}
