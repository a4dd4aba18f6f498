//! Profile lookup flow: cache first, provider on miss or stale entry.
//!
//! Only an invalid username, a missing profile or an upstream failure end
//! the lookup with an error. Cache reads, cache writes and picture mirroring
//! degrade to warnings.

use std::sync::Arc;

use chrono::Utc;
use igprofile_cloud::s3::profile_picture_key;
use igprofile_core::error::CoreError;
use igprofile_core::freshness::CachePolicy;
use igprofile_core::ports::{AssetStore, ProfileSource, ProfileStore};
use igprofile_core::profile::ProfileRecord;
use igprofile_core::username::Username;
use serde::Serialize;

/// Body returned for a successful lookup: the flattened record plus the
/// cache markers.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: ProfileRecord,
    pub cached: bool,
    /// Set when the refreshed profile could not be written back.
    #[serde(rename = "cacheError", skip_serializing_if = "Option::is_none")]
    pub cache_error: Option<String>,
}

/// Resolves usernames to profiles through the cache and the provider.
pub struct ProfileLookupService {
    store: Arc<dyn ProfileStore>,
    source: Arc<dyn ProfileSource>,
    assets: Option<Arc<dyn AssetStore>>,
    policy: CachePolicy,
}

impl ProfileLookupService {
    /// `assets` is `None` when picture mirroring is disabled.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        source: Arc<dyn ProfileSource>,
        assets: Option<Arc<dyn AssetStore>>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            store,
            source,
            assets,
            policy,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.store
    }

    /// Look up `raw_username`, serving the cached record while it is fresh.
    pub async fn lookup(&self, raw_username: &str) -> Result<ProfileResponse, CoreError> {
        let username = Username::parse(raw_username)?;

        match self.store.find_by_username(username.as_str()).await {
            Ok(Some(record)) if self.policy.is_fresh(record.updated_at, Utc::now()) => {
                tracing::debug!(%username, profile_id = record.id, "Cache hit");
                return Ok(ProfileResponse {
                    profile: record,
                    cached: true,
                    cache_error: None,
                });
            }
            Ok(Some(record)) => {
                tracing::debug!(
                    %username,
                    profile_id = record.id,
                    updated_at = %record.updated_at,
                    "Cached profile is stale, refreshing",
                );
            }
            Ok(None) => tracing::debug!(%username, "Cache miss"),
            Err(e) => {
                tracing::warn!(%username, error = %e, "Cache read failed, treating as miss");
            }
        }

        let fetched = self.source.fetch_profile(username.as_str()).await?;
        let mut record = fetched.into_record(Utc::now());
        tracing::info!(%username, profile_id = record.id, "Fetched profile from provider");

        if let Some(mirrored) = self.mirror_picture(&record).await {
            record.profile_pic_url = Some(mirrored);
        }

        let cache_error = match self.store.upsert(&record).await {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    %username,
                    profile_id = record.id,
                    error = %e,
                    "Failed to cache refreshed profile",
                );
                Some(e.to_string())
            }
        };

        Ok(ProfileResponse {
            profile: record,
            cached: false,
            cache_error,
        })
    }

    /// Copy the profile picture into the asset store.
    ///
    /// Returns the public URL of the copy, or `None` when mirroring is
    /// disabled, there is no picture, or any step failed.
    async fn mirror_picture(&self, record: &ProfileRecord) -> Option<String> {
        let assets = self.assets.as_ref()?;
        let source_url = record.profile_pic_url.as_deref()?;

        let asset = match self.source.fetch_asset(source_url).await {
            Ok(asset) => asset,
            Err(e) => {
                tracing::warn!(profile_id = record.id, error = %e, "Picture download failed");
                return None;
            }
        };

        let key = profile_picture_key(record.id);
        if let Err(e) = assets.put(&key, asset).await {
            tracing::warn!(profile_id = record.id, key = %key, error = %e, "Picture upload failed");
            return None;
        }

        tracing::debug!(profile_id = record.id, key = %key, "Profile picture mirrored");
        Some(assets.public_url(&key))
    }
}
