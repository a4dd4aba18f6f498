//! Domain layer for the Instagram profile lookup service.
//!
//! Holds the pieces that carry no I/O: the profile record, username rules,
//! the cache freshness policy, the shared error type and the traits the
//! lookup flow uses to reach its external collaborators.

pub mod error;
pub mod freshness;
pub mod ports;
pub mod profile;
pub mod types;
pub mod username;
