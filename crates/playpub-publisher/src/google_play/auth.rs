//! OAuth2 access tokens for the Google Play Developer API

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";

/// Google service account credentials
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Read and parse a service account JSON key file
    pub fn from_file(path: &Path) -> Result<Self> {
        let key_content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::ConfigurationError(format!(
                "Failed to read service account key {}: {}",
                path.display(),
                e
            ))
        })?;

        let key: ServiceAccountKey = serde_json::from_str(&key_content).map_err(|e| {
            StoreError::InvalidCredentials(format!("Invalid service account key: {}", e))
        })?;

        if key.client_email.is_empty() || key.private_key.is_empty() {
            return Err(StoreError::InvalidCredentials(
                "service account key is missing client_email or private_key".to_string(),
            ));
        }
        Ok(key)
    }
}

/// OAuth token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    access_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

/// Where access tokens come from
#[derive(Debug)]
pub(crate) enum TokenSource {
    /// A token obtained out of band, used as-is
    Static(String),
    /// JWT bearer grant signed with a service account key
    ServiceAccount {
        key: ServiceAccountKey,
        cache: RwLock<TokenCache>,
    },
}

impl TokenSource {
    pub(crate) fn service_account(key: ServiceAccountKey) -> Self {
        Self::ServiceAccount {
            key,
            cache: RwLock::new(TokenCache::default()),
        }
    }

    /// Get or refresh the access token
    pub(crate) async fn access_token(&self, client: &Client) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount { key, cache } => {
                {
                    let cache = cache.read().await;
                    if let (Some(token), Some(expires)) = (&cache.access_token, cache.expires_at) {
                        if Utc::now() < expires - Duration::minutes(5) {
                            return Ok(token.clone());
                        }
                    }
                }

                let token = exchange_jwt(client, key).await?;

                let mut cache = cache.write().await;
                cache.access_token = Some(token.access_token.clone());
                cache.expires_at = Some(Utc::now() + Duration::seconds(token.expires_in));
                Ok(token.access_token)
            }
        }
    }
}

async fn exchange_jwt(client: &Client, key: &ServiceAccountKey) -> Result<TokenResponse> {
    #[derive(Serialize)]
    struct Claims {
        iss: String,
        scope: String,
        aud: String,
        iat: i64,
        exp: i64,
    }

    let token_url = key.token_uri.as_deref().unwrap_or(TOKEN_URL);
    let now = Utc::now();
    let claims = Claims {
        iss: key.client_email.clone(),
        scope: ANDROID_PUBLISHER_SCOPE.to_string(),
        aud: token_url.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    };

    let encoding_key = jsonwebtoken::EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| StoreError::InvalidCredentials(format!("Invalid private key: {}", e)))?;

    let jwt = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
        &claims,
        &encoding_key,
    )?;

    debug!(client_email = %key.client_email, "requesting access token");
    let response = client
        .post(token_url)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(StoreError::AuthenticationFailed(error_text));
    }

    Ok(response.json().await?)
}
