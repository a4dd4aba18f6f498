//! REST API client for the profile provider.
//!
//! Wraps the provider's "user by username" endpoint and plain asset
//! downloads using [`reqwest`].

use async_trait::async_trait;
use igprofile_core::error::CoreError;
use igprofile_core::ports::ProfileSource;
use igprofile_core::profile::{Asset, FetchedProfile};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::payload::ProviderUser;

/// Header carrying the static provider access key.
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Path of the lookup-by-username endpoint.
pub const USER_BY_USERNAME_PATH: &str = "/v1/user/by/username";

/// HTTP client for the provider.
pub struct ProviderApi {
    client: reqwest::Client,
    api_url: String,
    access_key: String,
}

/// Errors from the provider REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider has no account with the requested username.
    #[error("Profile not found")]
    NotFound,

    /// The provider returned a non-2xx status other than 404.
    #[error("Provider API error ({status}): {reason}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, or the response body when there is none.
        reason: String,
    },
}

impl ProviderApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://api.hikerapi.com`.
    /// * `access_key` - Value sent in the [`ACCESS_KEY_HEADER`] header.
    pub fn new(api_url: String, access_key: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, access_key)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, access_key: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_key,
        }
    }

    /// Look up a profile by username.
    ///
    /// Sends `GET /v1/user/by/username?username=<u>`. A 404 maps to
    /// [`ProviderError::NotFound`].
    pub async fn user_by_username(&self, username: &str) -> Result<ProviderUser, ProviderError> {
        let response = self
            .client
            .get(format!("{}{USER_BY_USERNAME_PATH}", self.api_url))
            .query(&[("username", username)])
            .header(ACCESS_KEY_HEADER, &self.access_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ProviderUser>().await?)
    }

    /// Download the bytes behind `url` (a CDN link taken from a profile).
    ///
    /// No access key is sent; asset URLs are public and pre-signed.
    pub async fn download(&self, url: &str) -> Result<Asset, ProviderError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(Asset {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, [`ProviderError::NotFound`] on 404, and
    /// [`ProviderError::ApiError`] for every other failure status.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound);
        }
        if !status.is_success() {
            let reason = match status.canonical_reason() {
                Some(reason) => reason.to_string(),
                None => response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<unreadable body>".to_string()),
            };
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                reason,
            });
        }
        Ok(response)
    }
}

impl ProviderError {
    /// Convert into the domain error for a lookup of `username`.
    pub fn into_core(self, username: &str) -> CoreError {
        match self {
            Self::NotFound => CoreError::ProfileNotFound(username.to_string()),
            Self::ApiError { status, reason } => CoreError::Upstream {
                status: Some(status),
                reason,
            },
            Self::Request(err) => CoreError::Upstream {
                status: err.status().map(|s| s.as_u16()),
                reason: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl ProfileSource for ProviderApi {
    async fn fetch_profile(&self, username: &str) -> Result<FetchedProfile, CoreError> {
        tracing::debug!(username, "Fetching profile from provider");
        self.user_by_username(username)
            .await
            .map(FetchedProfile::from)
            .map_err(|e| e.into_core(username))
    }

    async fn fetch_asset(&self, url: &str) -> Result<Asset, CoreError> {
        self.download(url).await.map_err(|e| match e {
            // A missing picture is an asset failure, not a missing profile.
            ProviderError::NotFound => CoreError::Upstream {
                status: Some(404),
                reason: "Asset not found".to_string(),
            },
            other => other.into_core(url),
        })
    }
}
