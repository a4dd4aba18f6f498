//! [`ProfileStore`] backed by PostgreSQL.

use async_trait::async_trait;
use igprofile_core::error::CoreError;
use igprofile_core::ports::ProfileStore;
use igprofile_core::profile::ProfileRecord;

use crate::models::profile::UpsertInstagramProfile;
use crate::repositories::ProfileRepo;
use crate::DbPool;

/// Profile cache stored in the `instagram_profiles` table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: DbPool,
}

impl PgProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<ProfileRecord>, CoreError> {
        let row = ProfileRepo::find_by_username(&self.pool, username)
            .await
            .map_err(storage_error)?;
        Ok(row.map(ProfileRecord::from))
    }

    async fn upsert(&self, record: &ProfileRecord) -> Result<ProfileRecord, CoreError> {
        let dto = UpsertInstagramProfile::from(record);
        let row = ProfileRepo::upsert(&self.pool, &dto)
            .await
            .map_err(storage_error)?;
        tracing::debug!(profile_id = row.id, username = %row.username, "Profile upserted");
        Ok(row.into())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(storage_error)
    }
}

/// Map a sqlx error into [`CoreError::Storage`].
///
/// A unique violation on the username index means another id still holds
/// this username (the account it belonged to was renamed); it is reported
/// with the constraint name so the caller's log is actionable.
fn storage_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            return CoreError::Storage(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    CoreError::Storage(err.to_string())
}
