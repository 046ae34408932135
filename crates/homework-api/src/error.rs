//! Error types for the review API.
//!
//! The `Display` output of these errors is forwarded verbatim to the chat as
//! part of the failure notification, so the texts are written for the student
//! reading the message rather than for the log.

use thiserror::Error;

/// Errors that can occur while fetching and interpreting a status response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout, reset.
    #[error("Ошибка соединения с API: {0}")]
    Connection(#[source] reqwest::Error),

    /// The API answered with anything other than 200.
    #[error("API возвращает код, отличный от 200: {0}")]
    ServerStatus(reqwest::StatusCode),

    /// The body of a 200 response was not valid JSON.
    #[error("Не удалось разобрать ответ API: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response does not have the documented shape.
    #[error("Ответ API не соответствует документации")]
    Schema,

    /// The homework record carries no name.
    #[error("Отсутствует название домашней работы")]
    MissingHomework,

    /// The homework status is absent or not one of the known verdicts.
    #[error("Неизвестный статус \"{status}\" домашней работы \"{name}\"")]
    UnknownStatus {
        /// Name of the homework.
        name: String,
        /// Raw status value, empty when the field is missing.
        status: String,
    },

    /// The configured endpoint is not a valid URL.
    #[error("Некорректный адрес API: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl ApiError {
    /// Short label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::ServerStatus(_) => "server_status",
            Self::Decode(_) => "decode",
            Self::Schema => "schema",
            Self::MissingHomework | Self::UnknownStatus { .. } => "record",
            Self::InvalidEndpoint(_) => "config",
        }
    }

    /// Whether the error originated on the network path rather than in the payload.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ServerStatus(_))
    }
}

/// Result type for review API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
