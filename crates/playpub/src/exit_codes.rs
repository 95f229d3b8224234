//! Exit codes for the CLI

use playpub_core::PublishError;
use playpub_publisher::StoreError;

/// Success
pub const SUCCESS: u8 = 0;

/// General error
pub const ERROR: u8 = 1;

/// Configuration error
pub const CONFIG_ERROR: u8 = 2;

/// The publishing service rejected an upload, track update or commit
pub const UPLOAD_ERROR: u8 = 3;

/// The release could not be built
pub const RELEASE_ERROR: u8 = 4;

/// Pick the exit code for a finished command
pub fn for_result(result: &anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => SUCCESS,
        Err(err) => for_error(err),
    }
}

/// Pick the exit code for a failed command
pub fn for_error(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<PublishError>() {
        return match err {
            PublishError::Config(_) | PublishError::InvalidConfig(_) => CONFIG_ERROR,
            PublishError::RemoteRejected(_) => UPLOAD_ERROR,
            PublishError::BuildFailure(_) => RELEASE_ERROR,
            PublishError::RemoteUnavailable(_) | PublishError::Io { .. } => ERROR,
        };
    }

    match err.downcast_ref::<StoreError>() {
        Some(StoreError::InvalidCredentials(_) | StoreError::ConfigurationError(_)) => CONFIG_ERROR,
        _ => ERROR,
    }
}
