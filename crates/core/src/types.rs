/// Stable numeric profile identifier assigned by the provider.
pub type ProfileId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
