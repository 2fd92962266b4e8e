use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps a non-success HTTP status from the roster API onto the taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => AppError::BadRequest(message),
            401 => AppError::Auth(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            422 => AppError::ValidationError(message),
            405..=499 => AppError::BadRequest(format!("HTTP {}: {}", status, message)),
            _ => AppError::ExternalService(format!("HTTP {}: {}", status, message)),
        }
    }

    /// True when the API itself refused the request, as opposed to the
    /// request never completing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::Auth(_)
                | AppError::Forbidden(_)
                | AppError::NotFound(_)
                | AppError::BadRequest(_)
                | AppError::ValidationError(_)
                | AppError::Conflict(_)
        )
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
