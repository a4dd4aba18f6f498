//! Handler for the profile lookup endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::lookup::ProfileResponse;
use crate::state::AppState;

/// Request body for a lookup.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub username: Option<String>,
}

/// POST /profiles/lookup
///
/// Any body that does not carry a non-empty `username` string is a 400.
pub async fn lookup_profile(
    State(state): State<AppState>,
    body: Result<Json<LookupRequest>, JsonRejection>,
) -> AppResult<Json<ProfileResponse>> {
    let username = match body {
        Ok(Json(LookupRequest {
            username: Some(username),
        })) if !username.trim().is_empty() => username,
        Ok(_) => return Err(AppError::BadRequest("Username is required".into())),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected lookup body");
            return Err(AppError::BadRequest("Username is required".into()));
        }
    };

    let profile = state.lookup.lookup(&username).await?;
    Ok(Json(profile))
}
