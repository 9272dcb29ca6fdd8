use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 401: the access token is missing, expired or revoked.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// 403: the token is valid but does not grant access.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("External service error ({status})")]
    ExternalService { status: u16, message: Option<String> },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }

    /// Message reported by the backend, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            AppError::Auth(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg) => Some(msg.as_str()).filter(|m| !m.is_empty()),
            AppError::ExternalService { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the backend's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}
