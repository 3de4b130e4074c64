//! Error types for the tutor router.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TutorError {
    /// A required request field was missing or blank
    #[error("Malformed request: '{0}' is required and must not be empty")]
    MalformedRequest(&'static str),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Daemon not reachable: {0}")]
    DaemonUnreachable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TutorError {
    /// Stable numeric code carried in error responses
    pub fn code(&self) -> i32 {
        match self {
            TutorError::MalformedRequest(_) => -32602,
            TutorError::SessionStore(_) => -32010,
            TutorError::DaemonUnreachable(_) => -32000,
            TutorError::Json(_) => -32700,
        }
    }

    /// Whether the caller caused the failure (maps to HTTP 400)
    pub fn is_client_error(&self) -> bool {
        matches!(self, TutorError::MalformedRequest(_) | TutorError::Json(_))
    }
}
