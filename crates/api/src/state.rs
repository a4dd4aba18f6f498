use std::sync::Arc;

use crate::lookup::ProfileLookupService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Cache-then-provider profile lookup.
    pub lookup: Arc<ProfileLookupService>,
}
