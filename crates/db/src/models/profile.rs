//! Instagram profile model and DTOs.

use igprofile_core::profile::ProfileRecord;
use igprofile_core::types::{ProfileId, Timestamp};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `instagram_profiles` table.
#[derive(Debug, Clone, FromRow)]
pub struct InstagramProfile {
    pub id: ProfileId,
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub profile_pic_url: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
    pub is_business: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<InstagramProfile> for ProfileRecord {
    fn from(row: InstagramProfile) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            biography: row.biography,
            external_url: row.external_url,
            profile_pic_url: row.profile_pic_url,
            is_private: row.is_private,
            is_verified: row.is_verified,
            is_business: row.is_business,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for inserting or overwriting a profile keyed on `id`.
///
/// `updated_at` is supplied by the caller so the stored row and the
/// response carry the same refresh time.
#[derive(Debug, Clone)]
pub struct UpsertInstagramProfile {
    pub id: ProfileId,
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub profile_pic_url: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
    pub is_business: bool,
    pub updated_at: Timestamp,
}

impl From<&ProfileRecord> for UpsertInstagramProfile {
    fn from(record: &ProfileRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            full_name: record.full_name.clone(),
            biography: record.biography.clone(),
            external_url: record.external_url.clone(),
            profile_pic_url: record.profile_pic_url.clone(),
            is_private: record.is_private,
            is_verified: record.is_verified,
            is_business: record.is_business,
            updated_at: record.updated_at,
        }
    }
}
