//! Client for the third-party Instagram data provider.

pub mod api;
pub mod payload;

pub use api::{ProviderApi, ProviderError};
