//! Wire shapes returned by the provider.

use igprofile_core::profile::FetchedProfile;
use igprofile_core::types::ProfileId;
use serde::{Deserialize, Deserializer};

/// User payload returned by `GET /v1/user/by/username`.
///
/// Only the fields the cache stores are decoded; everything else in the
/// provider's (large) payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    /// Provider's primary key. Sent as a number by some endpoints and as a
    /// numeric string by others.
    #[serde(deserialize_with = "deserialize_pk")]
    pub pk: ProfileId,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_business: bool,
}

impl From<ProviderUser> for FetchedProfile {
    fn from(user: ProviderUser) -> Self {
        Self {
            id: user.pk,
            username: user.username,
            full_name: user.full_name,
            biography: user.biography,
            external_url: user.external_url,
            profile_pic_url: user.profile_pic_url,
            is_private: user.is_private,
            is_verified: user.is_verified,
            is_business: user.is_business,
        }
    }
}

fn deserialize_pk<'de, D>(deserializer: D) -> Result<ProfileId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Pk {
        Number(ProfileId),
        Text(String),
    }

    match Pk::deserialize(deserializer)? {
        Pk::Number(n) => Ok(n),
        Pk::Text(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("pk is not numeric: {s:?}"))),
    }
}
