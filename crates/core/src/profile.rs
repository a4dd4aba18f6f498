//! Profile record served to callers and stored in the cache.

use serde::{Deserialize, Serialize};

use crate::types::{ProfileId, Timestamp};
use crate::username::normalize_username;

/// Normalized profile record, as cached and as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
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

/// A profile as fetched from the provider, before it is stamped and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedProfile {
    pub id: ProfileId,
    pub username: String,
    pub full_name: Option<String>,
    pub biography: Option<String>,
    pub external_url: Option<String>,
    pub profile_pic_url: Option<String>,
    pub is_private: bool,
    pub is_verified: bool,
    pub is_business: bool,
}

impl FetchedProfile {
    /// Stamp the profile with its refresh time.
    ///
    /// The username is normalized so it always matches the lookup key, and
    /// empty optional strings collapse to `None`.
    pub fn into_record(self, updated_at: Timestamp) -> ProfileRecord {
        ProfileRecord {
            id: self.id,
            username: normalize_username(&self.username),
            full_name: non_empty(self.full_name),
            biography: non_empty(self.biography),
            external_url: non_empty(self.external_url),
            profile_pic_url: non_empty(self.profile_pic_url),
            is_private: self.is_private,
            is_verified: self.is_verified,
            is_business: self.is_business,
            updated_at,
        }
    }
}

/// Downloaded bytes of a remote asset (profile picture).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
