#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid Instagram username: {0}")]
    InvalidUsername(String),

    #[error("Instagram profile not found: {0}")]
    ProfileNotFound(String),

    /// The provider answered with an unexpected status, or could not be
    /// reached at all (`status` is `None` for transport failures).
    #[error("Upstream error ({}): {reason}", display_status(.status))]
    Upstream { status: Option<u16>, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no status".to_string(),
    }
}
