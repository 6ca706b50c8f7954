//! Error types for the econ-admin crates.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, protocol, input validation and storage errors.

use std::fmt;
use thiserror::Error;

/// Message recorded when the backend rejects a login without saying why.
pub const LOGIN_FAILED_FALLBACK: &str = "Login failed";

/// The unified error type for econ-admin operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (rejected credentials, missing session).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Protocol errors (non-success responses, unexpected bodies).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Input validation errors (bad URLs, bad route definitions).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Credential store errors.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// The message shown to a user after a failed login.
    ///
    /// Uses the server-supplied `error` field when present, otherwise
    /// [`LOGIN_FAILED_FALLBACK`].
    pub fn user_message(&self) -> String {
        match self {
            Error::Protocol(p) => p
                .error
                .clone()
                .unwrap_or_else(|| LOGIN_FAILED_FALLBACK.to_string()),
            _ => LOGIN_FAILED_FALLBACK.to_string(),
        }
    }

    /// Check if this error means the server rejected the presented credential.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Error::Protocol(p) => p.is_auth_error(),
            Error::Auth(AuthError::SessionInvalidated) => true,
            _ => false,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Session-related errors raised by this client rather than the backend.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An operation needed a session but none is active.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The server revoked the session while a request was in flight.
    #[error("session invalidated by server")]
    SessionInvalidated,

    /// A later login or logout started before this login resolved.
    #[error("login superseded by a later session action")]
    Superseded,
}

/// Protocol-level errors from backend responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// `error` field of the response body (if present).
    pub error: Option<String>,
    /// `message` field of the response body (if present).
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref error) = self.error {
            write!(f, " [{}]", error)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, error: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            error,
            message,
        }
    }

    /// Check if this is an authorization failure.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Invalid route definition.
    #[error("invalid route '{path}': {reason}")]
    Route { path: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be parsed or written.
    #[error("corrupt credential store: {0}")]
    Format(#[from] serde_json::Error),
}
