//! Error types for the notifier bot.

use thiserror::Error;

use homework_api::ApiError;

/// Errors that can occur in the bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// One or more required environment variables are absent or empty.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    /// Sending a message through the messenger failed.
    #[error("Failed to deliver message: {0}")]
    Delivery(String),

    /// Review API error.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

impl From<teloxide::RequestError> for BotError {
    fn from(e: teloxide::RequestError) -> Self {
        BotError::Delivery(e.to_string())
    }
}
