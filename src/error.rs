use crate::validation::ValidationErrors;
use reqwest::StatusCode;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Photo {0} already has a pending change")]
    Busy(u64),

    #[error("Photo ID is required")]
    MissingId,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Message shown to the user in a dialog's inline error panel.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Server { message, .. } => message.clone(),
            AppError::Http(_) | AppError::Io(_) => {
                "An unexpected error occurred.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}
