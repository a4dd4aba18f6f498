use axum::routing::post;
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/api/v1/profiles`.
pub fn router() -> Router<AppState> {
    Router::new().route("/lookup", post(profiles::lookup_profile))
}

/// Root-level lookup route (`POST /`), for single-function deployments.
pub fn root_router() -> Router<AppState> {
    Router::new().route("/", post(profiles::lookup_profile))
}
