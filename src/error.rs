//! Error handling for the Latte client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Latte client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// WebSocket errors from the notification feed
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A non-success response from the backend, with the server-provided
    /// message when one was present in the body
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Form-level validation errors, caught before any request is sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// A mutation refused client-side because the ticket is locked
    #[error("Ticket {0} is locked")]
    TicketLocked(i64),

    /// Realtime feed errors
    #[error("Realtime error: {0}")]
    Realtime(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new realtime error
    pub fn realtime<T: fmt::Display>(msg: T) -> Self {
        Error::Realtime(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The server-provided message of an API failure, if this is one.
    ///
    /// Handles use this to surface backend messages through the alert
    /// channel, falling back to a generic message otherwise.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
