//! Object storage for mirrored profile pictures.

pub mod s3;

pub use s3::{S3AssetStore, S3Settings, StorageError};
