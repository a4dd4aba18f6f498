#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use igprofile_api::config::{ProviderConfig, ServerConfig};
use igprofile_api::lookup::ProfileLookupService;
use igprofile_api::router::build_app_router;
use igprofile_api::state::AppState;
use igprofile_core::error::CoreError;
use igprofile_core::freshness::CachePolicy;
use igprofile_core::ports::{AssetStore, ProfileSource, ProfileStore};
use igprofile_core::profile::{Asset, FetchedProfile, ProfileRecord};

pub const PUBLIC_BASE: &str = "https://storage.test/instagram_profile_pictures";

/// Build a test `ServerConfig` with safe defaults (any CORS origin,
/// 30-day TTL, mirroring on).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        provider: ProviderConfig {
            base_url: "http://provider.invalid".to_string(),
            access_key: "test-key".to_string(),
        },
        cache_policy: CachePolicy::default(),
        storage: None,
        mirror_profile_pictures: true,
    }
}

// ---------------------------------------------------------------------------
// In-memory collaborators
// ---------------------------------------------------------------------------

/// Profile cache keyed by username, with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<String, ProfileRecord>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_health: AtomicBool,
    pub writes: AtomicUsize,
}

impl MemoryStore {
    pub fn insert(&self, record: ProfileRecord) {
        self.rows
            .lock()
            .unwrap()
            .insert(record.username.clone(), record);
    }

    pub fn get(&self, username: &str) -> Option<ProfileRecord> {
        self.rows.lock().unwrap().get(username).cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, CoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("connection refused".into()));
        }
        Ok(self.get(username))
    }

    async fn upsert(&self, record: &ProfileRecord) -> Result<ProfileRecord, CoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("write rejected".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|_, existing| existing.id != record.id);
        rows.insert(record.username.clone(), record.clone());
        Ok(record.clone())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        if self.fail_health.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("database unreachable".into()));
        }
        Ok(())
    }
}

/// Provider stand-in that counts calls.
#[derive(Default)]
pub struct FakeSource {
    profiles: Mutex<HashMap<String, FetchedProfile>>,
    assets: Mutex<HashMap<String, Asset>>,
    upstream_status: Mutex<Option<u16>>,
    pub profile_calls: AtomicUsize,
    pub asset_calls: AtomicUsize,
}

impl FakeSource {
    pub fn add_profile(&self, profile: FetchedProfile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.username.clone(), profile);
    }

    pub fn add_asset(&self, url: &str, bytes: &[u8]) {
        self.assets.lock().unwrap().insert(
            url.to_string(),
            Asset {
                bytes: bytes.to_vec(),
                content_type: Some("image/jpeg".to_string()),
            },
        );
    }

    /// Make every profile fetch fail with `status`.
    pub fn fail_with(&self, status: u16) {
        *self.upstream_status.lock().unwrap() = Some(status);
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for FakeSource {
    async fn fetch_profile(&self, username: &str) -> Result<FetchedProfile, CoreError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.upstream_status.lock().unwrap() {
            return Err(CoreError::Upstream {
                status: Some(status),
                reason: "Service Unavailable".into(),
            });
        }
        self.profiles
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| CoreError::ProfileNotFound(username.to_string()))
    }

    async fn fetch_asset(&self, url: &str) -> Result<Asset, CoreError> {
        self.asset_calls.fetch_add(1, Ordering::SeqCst);
        self.assets
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(CoreError::Upstream {
                status: Some(404),
                reason: "Asset not found".into(),
            })
    }
}

/// Bucket stand-in recording uploaded keys.
#[derive(Default)]
pub struct MemoryAssetStore {
    pub objects: Mutex<HashMap<String, Asset>>,
    pub fail_puts: AtomicBool,
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, key: &str, asset: Asset) -> Result<(), CoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("bucket unavailable".into()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), asset);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{PUBLIC_BASE}/{key}")
    }
}

// ---------------------------------------------------------------------------
// App harness
// ---------------------------------------------------------------------------

/// Collaborators wired into one app instance.
#[derive(Default)]
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub source: Arc<FakeSource>,
    pub assets: Arc<MemoryAssetStore>,
    pub mirroring: bool,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mirroring() -> Self {
        Self {
            mirroring: true,
            ..Self::default()
        }
    }

    /// Build the full application router with the same middleware stack
    /// production uses.
    pub fn app(&self) -> Router {
        let config = test_config();
        let assets = self
            .mirroring
            .then(|| Arc::clone(&self.assets) as Arc<dyn AssetStore>);
        let lookup = ProfileLookupService::new(
            Arc::clone(&self.store) as Arc<dyn ProfileStore>,
            Arc::clone(&self.source) as Arc<dyn ProfileSource>,
            assets,
            config.cache_policy,
        );
        let state = AppState {
            lookup: Arc::new(lookup),
        };
        build_app_router(state, &config)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const PIC_URL: &str = "https://cdn.example.com/p/787132.jpg";

pub fn fetched(username: &str, id: i64) -> FetchedProfile {
    FetchedProfile {
        id,
        username: username.to_string(),
        full_name: Some("National Geographic".to_string()),
        biography: Some("Experience the world".to_string()),
        external_url: Some("https://natgeo.com".to_string()),
        profile_pic_url: Some(PIC_URL.to_string()),
        is_private: false,
        is_verified: true,
        is_business: true,
    }
}

/// A stored record refreshed `age_days` ago.
pub fn stored(username: &str, id: i64, age_days: i64) -> ProfileRecord {
    fetched(username, id).into_record(Utc::now() - Duration::days(age_days))
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, body: String) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST `{"username": ...}` to the versioned lookup route.
pub async fn lookup(app: Router, username: &str) -> Response {
    post_json(
        app,
        "/api/v1/profiles/lookup",
        serde_json::json!({ "username": username }),
    )
    .await
}
