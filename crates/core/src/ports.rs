//! Traits for the external collaborators of the lookup flow.
//!
//! - [`ProfileStore`]: keyed read and upsert over `instagram_profiles`
//! - [`ProfileSource`]: the paid upstream provider
//! - [`AssetStore`]: the public bucket that mirrors profile pictures
//!
//! Implementations live in the `db`, `provider` and `cloud` crates. Every
//! method reports failures as [`CoreError`] so the lookup flow can decide
//! which ones are fatal.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::profile::{Asset, FetchedProfile, ProfileRecord};

/// Cache of previously fetched profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Look up a stored profile by its normalized username.
    async fn find_by_username(&self, username: &str)
        -> Result<Option<ProfileRecord>, CoreError>;

    /// Insert or overwrite the profile keyed on its `id`.
    async fn upsert(&self, record: &ProfileRecord) -> Result<ProfileRecord, CoreError>;

    /// Cheap connectivity check used by `/health`.
    async fn health_check(&self) -> Result<(), CoreError>;
}

/// Authoritative profile data.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch a profile by normalized username.
    ///
    /// Returns [`CoreError::ProfileNotFound`] when the provider has no such
    /// account and [`CoreError::Upstream`] for any other failure.
    async fn fetch_profile(&self, username: &str) -> Result<FetchedProfile, CoreError>;

    /// Download a remote asset referenced by a fetched profile.
    async fn fetch_asset(&self, url: &str) -> Result<Asset, CoreError>;
}

/// Public object storage for mirrored pictures.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload `asset` under `key`, overwriting any existing object.
    async fn put(&self, key: &str, asset: Asset) -> Result<(), CoreError>;

    /// Public URL at which the object stored under `key` is served.
    fn public_url(&self, key: &str) -> String;
}
