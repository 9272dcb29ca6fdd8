use thiserror::Error;

use shared_models::error::AppError;

/// Login form state. Cleared once the user is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), LoginError> {
        if self.username.trim().is_empty() {
            return Err(LoginError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(LoginError::EmptyPassword);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.username.clear();
        self.password.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyFlush {
    /// No survey was waiting.
    Nothing,
    /// A result is already recorded; the queued payload was left alone.
    AlreadySubmitted,
    Submitted,
    /// Submission was attempted and failed; the payload stays queued.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub redirect_to: String,
    pub survey: SurveyFlush,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoginError {
    #[error("Please enter your username")]
    EmptyUsername,

    #[error("Please enter your password")]
    EmptyPassword,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Unable to connect. Please check your internet connection and try again.")]
    Connectivity,

    #[error("Could not save your session: {0}")]
    Session(AppError),
}

impl LoginError {
    /// Transport failures become a connectivity notice; everything else the
    /// auth service reports is shown as bad credentials.
    pub fn classify(err: &AppError) -> Self {
        if err.is_network() {
            LoginError::Connectivity
        } else {
            LoginError::InvalidCredentials
        }
    }

    /// Errors that belong next to a form field rather than in a banner.
    pub fn is_inline(&self) -> bool {
        matches!(self, LoginError::EmptyUsername | LoginError::EmptyPassword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_fields() {
        assert_eq!(Credentials::new("", "secret").validate(), Err(LoginError::EmptyUsername));
        assert_eq!(Credentials::new("   ", "secret").validate(), Err(LoginError::EmptyUsername));
        assert_eq!(Credentials::new("alice", "").validate(), Err(LoginError::EmptyPassword));
        assert!(Credentials::new("alice", "secret").validate().is_ok());
    }

    #[test]
    fn test_classify_masks_non_network_failures() {
        assert_eq!(LoginError::classify(&AppError::Network("refused".into())), LoginError::Connectivity);
        assert_eq!(LoginError::classify(&AppError::Auth("bad".into())), LoginError::InvalidCredentials);
        assert_eq!(
            LoginError::classify(&AppError::ExternalService { status: 423, message: Some("Account locked".into()) }),
            LoginError::InvalidCredentials
        );
    }

    #[test]
    fn test_clear_wipes_both_fields() {
        let mut credentials = Credentials::new("alice", "secret");
        credentials.clear();
        assert_eq!(credentials, Credentials::default());
    }
}
