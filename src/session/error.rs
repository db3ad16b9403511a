//! Session error types

use thiserror::Error;

use super::role::Role;

/// Errors that can occur while managing an authenticated session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Action not allowed from the current auth state
    #[error("Invalid transition: cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// Sign-in completed for a different user than the one that started it
    #[error("User mismatch: expected {expected}, got {actual}")]
    UserMismatch { expected: String, actual: String },

    /// Requested role is not held by the user
    #[error("Role not available: {0}")]
    RoleNotAvailable(Role),

    /// Unrecognised role name
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// No signed-in session
    #[error("Not signed in")]
    NotSignedIn,

    /// Preference store I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Preference file could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
