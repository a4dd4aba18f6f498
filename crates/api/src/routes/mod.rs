pub mod health;
pub mod profiles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /profiles/lookup    POST
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/profiles", profiles::router())
}
