//! reqwest implementation of [`EditsApi`]

use playpub_core::ExpansionFileType;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio::fs::File;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::auth::{ServiceAccountKey, TokenSource};
use super::{Credentials, GooglePlayConfig};
use crate::error::{Result, StoreError};
use crate::traits::EditsApi;
use crate::types::*;

/// Maximum number of retries for rate-limited JSON requests
const MAX_RETRIES: u32 = 3;

/// Fallback wait when a 429 carries no Retry-After header
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";
const OCTET_STREAM: &str = "application/octet-stream";

/// Google Play Developer API client
pub struct GooglePlayClient {
    config: GooglePlayConfig,
    client: Client,
    tokens: TokenSource,
}

impl GooglePlayClient {
    /// Create a new client, loading the service account key if one is configured
    pub fn new(config: GooglePlayConfig) -> Result<Self> {
        let tokens = match &config.credentials {
            Credentials::AccessToken(token) => TokenSource::Static(token.clone()),
            Credentials::ServiceAccountKey(path) => {
                TokenSource::service_account(ServiceAccountKey::from_file(path)?)
            }
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    fn edit_endpoint(&self, package_name: &str, edit_id: &str) -> String {
        format!(
            "{}/applications/{}/edits/{}",
            self.config.api_base_url, package_name, edit_id
        )
    }

    fn upload_endpoint(&self, package_name: &str, edit_id: &str) -> String {
        format!(
            "{}/applications/{}/edits/{}",
            self.config.upload_base_url, package_name, edit_id
        )
    }

    /// Make an authenticated JSON request, retrying when rate limited
    async fn json_request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let mut retries = 0;

        loop {
            let token = self.tokens.access_token(&self.client).await?;
            debug!("Making {} request to {}", method, url);

            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(&token)
                .header("Content-Type", "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after(&response);
                if retries >= MAX_RETRIES {
                    return Err(StoreError::RateLimited {
                        retry_after: Some(retry_after),
                    });
                }

                warn!(
                    "Rate limited, waiting {} seconds before retry ({}/{})",
                    retry_after,
                    retries + 1,
                    MAX_RETRIES
                );
                sleep(Duration::from_secs(retry_after)).await;
                retries += 1;
                continue;
            }

            return parse_response(response).await;
        }
    }

    /// Stream a file as the body of a media upload. Never retried.
    async fn media_upload<T: DeserializeOwned>(
        &self,
        url: &str,
        content_type: &str,
        media: File,
    ) -> Result<T> {
        let token = self.tokens.access_token(&self.client).await?;
        let length = media.metadata().await?.len();
        debug!(bytes = length, "Uploading media to {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .header("Content-Type", content_type)
            .header("Content-Length", length)
            .body(reqwest::Body::from(media))
            .send()
            .await?;

        parse_response(response).await
    }
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Google's JSON error envelope
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let error_text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&error_text)
        .map(|envelope| envelope.error.message)
        .unwrap_or(error_text);

    Err(StoreError::ApiError {
        status: status.as_u16(),
        message,
    })
}

#[async_trait::async_trait]
impl EditsApi for GooglePlayClient {
    async fn insert_edit(&self, package_name: &str) -> Result<AppEdit> {
        let url = format!("{}/applications/{}/edits", self.config.api_base_url, package_name);
        self.json_request(Method::POST, &url, Some(&serde_json::json!({})))
            .await
    }

    async fn upload_bundle(
        &self,
        package_name: &str,
        edit_id: &str,
        media: File,
        ack_bundle_installation_warning: bool,
    ) -> Result<Bundle> {
        let mut url = format!(
            "{}/bundles?uploadType=media",
            self.upload_endpoint(package_name, edit_id)
        );
        if ack_bundle_installation_warning {
            url.push_str("&ackBundleInstallationWarning=true");
        }
        self.media_upload(&url, OCTET_STREAM, media).await
    }

    async fn upload_apk(&self, package_name: &str, edit_id: &str, media: File) -> Result<Apk> {
        let url = format!(
            "{}/apks?uploadType=media",
            self.upload_endpoint(package_name, edit_id)
        );
        self.media_upload(&url, APK_CONTENT_TYPE, media).await
    }

    async fn upload_expansion_file(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        file_type: ExpansionFileType,
        media: File,
    ) -> Result<()> {
        let url = format!(
            "{}/apks/{}/expansionFiles/{}?uploadType=media",
            self.upload_endpoint(package_name, edit_id),
            version_code,
            file_type
        );
        let _: serde_json::Value = self.media_upload(&url, OCTET_STREAM, media).await?;
        Ok(())
    }

    async fn upload_deobfuscation_file(
        &self,
        package_name: &str,
        edit_id: &str,
        version_code: i64,
        deobfuscation_file_type: &str,
        media: File,
    ) -> Result<()> {
        let url = format!(
            "{}/apks/{}/deobfuscationFiles/{}?uploadType=media",
            self.upload_endpoint(package_name, edit_id),
            version_code,
            deobfuscation_file_type
        );
        let _: serde_json::Value = self.media_upload(&url, OCTET_STREAM, media).await?;
        Ok(())
    }

    async fn update_track(&self, package_name: &str, edit_id: &str, track: &Track) -> Result<()> {
        let url = format!(
            "{}/tracks/{}",
            self.edit_endpoint(package_name, edit_id),
            track.track
        );
        let body = serde_json::to_value(track)?;
        let _: serde_json::Value = self.json_request(Method::PUT, &url, Some(&body)).await?;
        Ok(())
    }

    async fn validate_edit(&self, package_name: &str, edit_id: &str) -> Result<AppEdit> {
        let url = format!("{}:validate", self.edit_endpoint(package_name, edit_id));
        self.json_request(Method::POST, &url, None).await
    }

    async fn commit_edit(
        &self,
        package_name: &str,
        edit_id: &str,
        changes_not_sent_for_review: bool,
    ) -> Result<AppEdit> {
        let mut url = format!("{}:commit", self.edit_endpoint(package_name, edit_id));
        if changes_not_sent_for_review {
            url.push_str("?changesNotSentForReview=true");
        }
        self.json_request(Method::POST, &url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use playpub_core::{ReleaseDescriptor, ReleaseStatus};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn client_for(server: &MockServer) -> GooglePlayClient {
        GooglePlayClient::new(GooglePlayConfig {
            credentials: Credentials::AccessToken("test-token".to_string()),
            api_base_url: server.url("/androidpublisher/v3"),
            upload_base_url: server.url("/upload/androidpublisher/v3"),
        })
        .unwrap()
    }

    async fn media(temp: &TempDir, name: &str) -> File {
        let path = temp.path().join(name);
        std::fs::write(&path, b"PK\x03\x04 artifact").unwrap();
        File::open(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_edit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/androidpublisher/v3/applications/com.example.app/edits")
                    .header("authorization", "Bearer test-token");
                then.status(200).json_body(serde_json::json!({
                    "id": "edit-1",
                    "expiryTimeSeconds": "1700000000"
                }));
            })
            .await;

        let edit = client_for(&server).insert_edit("com.example.app").await.unwrap();
        mock.assert_async().await;
        assert_eq!(edit.id, "edit-1");
        assert_eq!(edit.expiry_time_seconds.as_deref(), Some("1700000000"));
    }

    #[tokio::test]
    async fn test_upload_bundle_with_acknowledgement() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload/androidpublisher/v3/applications/com.example.app/edits/edit-1/bundles")
                    .query_param("uploadType", "media")
                    .query_param("ackBundleInstallationWarning", "true")
                    .header("content-type", "application/octet-stream");
                then.status(200)
                    .json_body(serde_json::json!({ "versionCode": 120, "sha256": "abc" }));
            })
            .await;

        let bundle = client_for(&server)
            .upload_bundle("com.example.app", "edit-1", media(&temp, "app.aab").await, true)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(bundle.version_code, 120);
    }

    #[tokio::test]
    async fn test_upload_apk_content_type() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload/androidpublisher/v3/applications/com.example.app/edits/edit-1/apks")
                    .header("content-type", APK_CONTENT_TYPE);
                then.status(200).json_body(serde_json::json!({
                    "versionCode": 77,
                    "binary": { "sha1": "f00" }
                }));
            })
            .await;

        let apk = client_for(&server)
            .upload_apk("com.example.app", "edit-1", media(&temp, "app.apk").await)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(apk.version_code, 77);
    }

    #[tokio::test]
    async fn test_expansion_and_mapping_paths() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start_async().await;
        let expansion = server
            .mock_async(|when, then| {
                when.method(POST).path(
                    "/upload/androidpublisher/v3/applications/com.example.app/edits/edit-1/apks/77/expansionFiles/patch",
                );
                then.status(200)
                    .json_body(serde_json::json!({ "expansionFile": { "fileSize": "12" } }));
            })
            .await;
        let mapping = server
            .mock_async(|when, then| {
                when.method(POST).path(
                    "/upload/androidpublisher/v3/applications/com.example.app/edits/edit-1/apks/77/deobfuscationFiles/proguard",
                );
                then.status(200).json_body(serde_json::json!({
                    "deobfuscationFile": { "symbolType": "proguard" }
                }));
            })
            .await;

        let client = client_for(&server);
        client
            .upload_expansion_file(
                "com.example.app",
                "edit-1",
                77,
                ExpansionFileType::Patch,
                media(&temp, "patch.obb").await,
            )
            .await
            .unwrap();
        client
            .upload_deobfuscation_file(
                "com.example.app",
                "edit-1",
                77,
                PROGUARD_DEOBFUSCATION_TYPE,
                media(&temp, "mapping.txt").await,
            )
            .await
            .unwrap();

        expansion.assert_async().await;
        mapping.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_track_sends_release() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/androidpublisher/v3/applications/com.example.app/edits/edit-1/tracks/beta")
                    .json_body(serde_json::json!({
                        "track": "beta",
                        "releases": [{
                            "versionCodes": ["5"],
                            "status": "completed",
                            "inAppUpdatePriority": 0
                        }]
                    }));
                then.status(200).json_body(serde_json::json!({ "track": "beta" }));
            })
            .await;

        let track = Track {
            track: "beta".to_string(),
            releases: vec![ReleaseDescriptor {
                version_codes: vec![5],
                status: ReleaseStatus::Completed,
                user_fraction: None,
                name: None,
                release_notes: BTreeMap::new(),
                in_app_update_priority: 0,
            }],
        };
        client_for(&server)
            .update_track("com.example.app", "edit-1", &track)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_commit_without_review_flag() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/androidpublisher/v3/applications/com.example.app/edits/edit-1:commit")
                    .query_param("changesNotSentForReview", "true");
                then.status(200).json_body(serde_json::json!({ "id": "edit-1" }));
            })
            .await;

        let edit = client_for(&server)
            .commit_edit("com.example.app", "edit-1", true)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(edit.id, "edit-1");
    }

    #[tokio::test]
    async fn test_error_envelope_becomes_api_error() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload/androidpublisher/v3/applications/com.example.app/edits/edit-1/bundles");
                then.status(403).json_body(serde_json::json!({
                    "error": {
                        "code": 403,
                        "message": "The installation of the app bundle may be too large and trigger user warning on some devices, and this needs to be explicitly acknowledged in the request.",
                        "status": "PERMISSION_DENIED"
                    }
                }));
            })
            .await;

        let err = client_for(&server)
            .upload_bundle("com.example.app", "edit-1", media(&temp, "app.aab").await, false)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ApiError { status: 403, .. }));
        assert!(err
            .to_string()
            .starts_with("Error 403: The installation of the app bundle may be too large"));
    }

    #[tokio::test]
    async fn test_plain_error_body_is_kept() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/androidpublisher/v3/applications/com.example.app/edits");
                then.status(500).body("backend unavailable");
            })
            .await;

        let err = client_for(&server).insert_edit("com.example.app").await.unwrap_err();
        assert_eq!(err.to_string(), "Error 500: backend unavailable");
    }

    #[tokio::test]
    async fn test_rate_limited_json_request_gives_up() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/androidpublisher/v3/applications/com.example.app/edits/edit-1:validate");
                then.status(429).header("Retry-After", "0");
            })
            .await;

        let err = client_for(&server)
            .validate_edit("com.example.app", "edit-1")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::RateLimited { .. }));
        mock.assert_hits_async(MAX_RETRIES as usize + 1).await;
    }
}
