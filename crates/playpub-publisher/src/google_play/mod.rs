//! Google Play Developer API client
//!
//! Implements [`crate::EditsApi`] against the Android Publisher v3 REST API.
//!
//! ## Authentication
//!
//! Uses a Google Cloud service account with Google Play Developer API access,
//! or an access token obtained out of band.
//!
//! ## Usage
//!
//! ```ignore
//! use playpub_publisher::google_play::{Credentials, GooglePlayClient, GooglePlayConfig};
//!
//! let client = GooglePlayClient::new(GooglePlayConfig::new(
//!     Credentials::ServiceAccountKey("service-account.json".into()),
//! ))?;
//! let edit = client.insert_edit("com.example.app").await?;
//! ```

mod auth;
mod client;

pub use auth::ServiceAccountKey;
pub use client::GooglePlayClient;

use std::path::PathBuf;

/// Base URL for JSON endpoints
pub const API_BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";

/// Base URL for media upload endpoints
pub const UPLOAD_BASE_URL: &str =
    "https://androidpublisher.googleapis.com/upload/androidpublisher/v3";

/// How the client authenticates
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Path to a service account JSON key
    ServiceAccountKey(PathBuf),
    /// Pre-issued OAuth2 access token
    AccessToken(String),
}

/// Google Play client configuration
#[derive(Debug, Clone)]
pub struct GooglePlayConfig {
    pub credentials: Credentials,
    pub api_base_url: String,
    pub upload_base_url: String,
}

impl GooglePlayConfig {
    /// Configuration pointing at the public Google endpoints
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base_url: API_BASE_URL.to_string(),
            upload_base_url: UPLOAD_BASE_URL.to_string(),
        }
    }
}

/// Play Console URL for the tracks of a package
pub fn console_url(package_name: &str) -> String {
    format!(
        "https://play.google.com/console/developers/app/{}/tracks",
        package_name
    )
}
