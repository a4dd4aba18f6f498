//! Instagram username normalization and validation.
//!
//! Callers send usernames in whatever shape they copied them: mixed case,
//! with one or more leading `@`. [`normalize_username`] folds those into the
//! canonical key used for cache lookups, and [`validate_username`] enforces
//! the character rules Instagram itself applies.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Instagram caps usernames at 30 characters.
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Allowed character set for a normalized username.
pub const USERNAME_CHARSET_PATTERN: &str = r"^[a-z0-9._]+$";

static USERNAME_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_CHARSET_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Trim, lowercase and strip every leading `@`.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase().trim_start_matches('@').to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an already-normalized username.
///
/// Rules:
/// - only `a-z`, `0-9`, `_` and `.`
/// - not made of digits only
/// - no two consecutive separators (`__`, `..`, `._`, `_.`)
/// - must not start or end with `.`
/// - between 1 and [`MAX_USERNAME_LENGTH`] characters
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidUsername(format!("'{username}' {reason}"));

    if username.is_empty() {
        return Err(invalid("is empty"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(invalid("is longer than 30 characters"));
    }
    if !USERNAME_CHARSET_RE.is_match(username) {
        return Err(invalid("contains characters other than a-z, 0-9, '_' and '.'"));
    }
    if username.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("is made of digits only"));
    }
    if username
        .as_bytes()
        .windows(2)
        .any(|pair| is_separator(pair[0]) && is_separator(pair[1]))
    {
        return Err(invalid("contains consecutive '_' or '.' characters"));
    }
    if username.starts_with('.') || username.ends_with('.') {
        return Err(invalid("starts or ends with '.'"));
    }

    Ok(())
}

fn is_separator(b: u8) -> bool {
    b == b'_' || b == b'.'
}

// ---------------------------------------------------------------------------
// Username newtype
// ---------------------------------------------------------------------------

/// A normalized username that passed [`validate_username`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Normalize `raw` and validate the result.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_username(raw);
        validate_username(&normalized)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
