//! Tests for `S3AssetStore` uploads against a mock S3 endpoint.

use assert_matches::assert_matches;
use igprofile_cloud::s3::{profile_picture_key, DEFAULT_BUCKET};
use igprofile_cloud::{S3AssetStore, S3Settings};
use igprofile_core::error::CoreError;
use igprofile_core::ports::AssetStore;
use igprofile_core::profile::Asset;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PICTURE_PATH: &str = "/instagram_profile_pictures/42.jpg";

async fn store(server: &MockServer) -> S3AssetStore {
    S3AssetStore::connect(S3Settings {
        endpoint: server.uri(),
        region: "us-east-1".to_string(),
        access_key_id: "test-id".to_string(),
        secret_access_key: "test-secret".to_string(),
        bucket: DEFAULT_BUCKET.to_string(),
        public_url: server.uri(),
    })
    .await
}

fn asset(content_type: Option<&str>) -> Asset {
    Asset {
        bytes: vec![0x89, 0x50, 0x4E, 0x47],
        content_type: content_type.map(str::to_string),
    }
}

async fn mount_ok(server: &MockServer) {
    Mock::given(method("PUT"))
        .and(path(PICTURE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

/// Content type of the single PUT the server received.
async fn uploaded_content_type(server: &MockServer) -> Option<String> {
    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT" && r.url.path() == PICTURE_PATH)
        .expect("PUT request for the picture");
    put.headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// An image content type is stored as downloaded.
#[tokio::test]
async fn put_keeps_image_content_type() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    store(&server)
        .await
        .put(&profile_picture_key(42), asset(Some("image/png")))
        .await
        .expect("upload should succeed");

    assert_eq!(uploaded_content_type(&server).await.as_deref(), Some("image/png"));
}

/// A non-image content type falls back to JPEG.
#[tokio::test]
async fn put_replaces_non_image_content_type() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    store(&server)
        .await
        .put("42.jpg", asset(Some("text/html")))
        .await
        .expect("upload should succeed");

    assert_eq!(uploaded_content_type(&server).await.as_deref(), Some("image/jpeg"));
}

/// A download without a content type is stored as JPEG.
#[tokio::test]
async fn put_defaults_missing_content_type() {
    let server = MockServer::start().await;
    mount_ok(&server).await;

    store(&server)
        .await
        .put("42.jpg", asset(None))
        .await
        .expect("upload should succeed");

    assert_eq!(uploaded_content_type(&server).await.as_deref(), Some("image/jpeg"));
}

/// A rejected upload surfaces as a storage error naming bucket and key.
#[tokio::test]
async fn put_rejected_is_storage_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(PICTURE_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("content-type", "application/xml")
                .set_body_string(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>",
                ),
        )
        .mount(&server)
        .await;

    let err = store(&server)
        .await
        .put("42.jpg", asset(Some("image/jpeg")))
        .await
        .expect_err("403 should fail");

    assert_matches!(
        err,
        CoreError::Storage(ref msg) if msg.contains("instagram_profile_pictures") && msg.contains("42.jpg")
    );
}
