//! Error taxonomy for backend calls.

use model::logout::is_unauthenticated;
use model::pagination::EnvelopeError;
use model::{FieldErrors, WizardError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Shown when the server gave no usable message.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Rejected before submission, or a 422 with per-field errors.
    #[error("{0}")]
    Validation(FieldErrors),
    /// The wizard refused to send a request (e.g. missing session id).
    #[error(transparent)]
    Wizard(#[from] WizardError),
    /// The session token is gone; the user must log in again.
    #[error("{0}")]
    Unauthenticated(String),
    /// Non-2xx response.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// 2xx response carrying `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
    /// The response did not have the shape the client expects.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            ApiError::Unauthenticated(_) => true,
            ApiError::Server { message, .. } | ApiError::Rejected(message) => {
                is_unauthenticated(message)
            }
            _ => false,
        }
    }

    pub fn is_missing_session(&self) -> bool {
        matches!(self, ApiError::Wizard(WizardError::MissingSession))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Text for a toast.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR.to_string()
        } else {
            message
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<EnvelopeError> for ApiError {
    fn from(e: EnvelopeError) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_detection_covers_all_message_carriers() {
        assert!(ApiError::Unauthenticated("x".into()).is_unauthenticated());
        assert!(ApiError::Server {
            status: 500,
            message: "Unauthenticated.".into()
        }
        .is_unauthenticated());
        assert!(ApiError::Rejected("user unauthenticated".into()).is_unauthenticated());
        assert!(!ApiError::Network("unauthenticated".into()).is_unauthenticated());
    }

    #[test]
    fn missing_session_message() {
        let err = ApiError::from(WizardError::MissingSession);
        assert!(err.is_missing_session());
        assert_eq!(err.user_message(), "Session ID is missing");
    }

    #[test]
    fn blank_messages_fall_back() {
        assert_eq!(ApiError::Rejected("  ".into()).user_message(), GENERIC_ERROR);
    }
}
