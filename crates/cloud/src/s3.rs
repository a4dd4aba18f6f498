//! S3-compatible object storage for mirrored profile pictures.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use igprofile_core::error::CoreError;
use igprofile_core::ports::AssetStore;
use igprofile_core::profile::Asset;
use igprofile_core::types::ProfileId;

/// Bucket holding mirrored profile pictures.
pub const DEFAULT_BUCKET: &str = "instagram_profile_pictures";

/// Content type used when the download did not report one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// `PutObject` failed.
    #[error("Failed to upload '{key}' to bucket '{bucket}': {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

/// Connection settings for an S3-compatible endpoint.
#[derive(Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Base URL under which objects are publicly served; the object URL is
    /// `{public_url}/{bucket}/{key}`.
    pub public_url: String,
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("public_url", &self.public_url)
            .finish()
    }
}

/// Object key for a profile's picture.
pub fn profile_picture_key(id: ProfileId) -> String {
    format!("{id}.jpg")
}

/// Public base URL derived from an S3 endpoint.
///
/// Supabase-style endpoints (`.../storage/v1/s3`) serve public objects from
/// `.../storage/v1/object/public`; plain path-style S3 endpoints serve them
/// from the endpoint itself.
pub fn default_public_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    match endpoint.strip_suffix("/s3") {
        Some(base) => format!("{base}/object/public"),
        None => endpoint.to_string(),
    }
}

/// [`AssetStore`] writing to one bucket of an S3-compatible service.
#[derive(Clone)]
pub struct S3AssetStore {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3AssetStore {
    /// Build an SDK client for `settings` (static credentials, path-style
    /// addressing as required by most S3-compatible services).
    pub async fn connect(settings: S3Settings) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "igprofile-static",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region))
            .endpoint_url(settings.endpoint)
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self::with_client(Client::from_conf(s3_config), settings.bucket, settings.public_url)
    }

    pub fn with_client(client: Client, bucket: String, public_url: String) -> Self {
        Self {
            client,
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload `body` under `key`. S3 `PutObject` replaces any existing
    /// object with the same key.
    pub async fn upload(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(bucket = %self.bucket, key, "Object uploaded");
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, self.bucket, key)
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn put(&self, key: &str, asset: Asset) -> Result<(), CoreError> {
        let content_type = asset
            .content_type
            .as_deref()
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        self.upload(key, asset.bytes, &content_type)
            .await
            .map_err(CoreError::from)
    }

    fn public_url(&self, key: &str) -> String {
        self.object_url(key)
    }
}
