use thiserror::Error;

/// Request-time authorization failures; the display text is sent to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,
    #[error("Invalid Authorization header. Expected: Bearer <token>")]
    InvalidHeader,
    #[error("Unknown token")]
    UnknownToken,
    #[error("Editor role required")]
    EditorRequired,
}

impl AuthError {
    /// HTTP status for external mapping
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingHeader | AuthError::InvalidHeader => 401,
            AuthError::UnknownToken | AuthError::EditorRequired => 403,
        }
    }
}
