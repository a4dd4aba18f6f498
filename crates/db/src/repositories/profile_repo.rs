//! Repository for the `instagram_profiles` table.

use igprofile_core::types::ProfileId;
use sqlx::PgPool;

use crate::models::profile::{InstagramProfile, UpsertInstagramProfile};

/// Column list for `instagram_profiles` queries.
const COLUMNS: &str = "\
    id, username, full_name, biography, external_url, profile_pic_url, \
    is_private, is_verified, is_business, created_at, updated_at";

/// Provides data access for cached Instagram profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Find a profile by its normalized username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<InstagramProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instagram_profiles WHERE username = $1");
        sqlx::query_as::<_, InstagramProfile>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by the provider's numeric id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: ProfileId,
    ) -> Result<Option<InstagramProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instagram_profiles WHERE id = $1");
        sqlx::query_as::<_, InstagramProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite a profile.
    ///
    /// Uses `ON CONFLICT (id) DO UPDATE` so a refresh replaces every column
    /// in place; `created_at` keeps its original value. Concurrent writers
    /// for the same id resolve as last-write-wins.
    pub async fn upsert(
        pool: &PgPool,
        dto: &UpsertInstagramProfile,
    ) -> Result<InstagramProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO instagram_profiles \
                 (id, username, full_name, biography, external_url, profile_pic_url, \
                  is_private, is_verified, is_business, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                 username = EXCLUDED.username, \
                 full_name = EXCLUDED.full_name, \
                 biography = EXCLUDED.biography, \
                 external_url = EXCLUDED.external_url, \
                 profile_pic_url = EXCLUDED.profile_pic_url, \
                 is_private = EXCLUDED.is_private, \
                 is_verified = EXCLUDED.is_verified, \
                 is_business = EXCLUDED.is_business, \
                 updated_at = EXCLUDED.updated_at \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InstagramProfile>(&query)
            .bind(dto.id)
            .bind(&dto.username)
            .bind(&dto.full_name)
            .bind(&dto.biography)
            .bind(&dto.external_url)
            .bind(&dto.profile_pic_url)
            .bind(dto.is_private)
            .bind(dto.is_verified)
            .bind(dto.is_business)
            .bind(dto.updated_at)
            .fetch_one(pool)
            .await
    }
}
