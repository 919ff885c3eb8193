//! Error types for the navigation menu

use thiserror::Error;

/// Main error type for the navigation menu
#[derive(Error, Debug)]
pub enum NavError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Deployment error: {0}")]
    DeployError(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),

    #[error("Collaborator error: {0}")]
    CollaboratorError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for NavError {
    fn from(err: anyhow::Error) -> Self {
        NavError::Internal(err.to_string())
    }
}
