//! Error types for Grammar Bot

use thiserror::Error;

/// Result type alias using Grammar Bot's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in Grammar Bot
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected before any model call is made
    #[error("{0}")]
    InvalidInput(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    /// The model answered, but with nothing in it
    #[error("Failed to get response from AI model")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether the caller, not the upstream service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
