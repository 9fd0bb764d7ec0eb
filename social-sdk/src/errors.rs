//! Unified error types for the `social` crate.
//!
//! This module centralizes all failures that can occur while using the SDK and
//! provides a single top-level [`Error`] enum plus the convenient [`Result`] alias.
//! Errors from lower layers (`reqwest`, URL parsing, JSON, I/O) are mapped into
//! structured variants so callers can handle them precisely.

use thiserror::Error;

use social_common::constants::MAX_PUBLICATION_CHARS;

// --- Build-Time Error ---

/// Errors that can occur while building a [`crate::SocialHttpClient`].
#[derive(Debug, Error)]
pub enum BuildError {
    /// The API base URL could not be parsed.
    #[error("Invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// --- The Main Operational Error Enum ---

/// The crate’s top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Request`] — transport failures and server-reported failures
/// - [`Error::Authentication`] — missing or invalid session
/// - [`Error::Validation`] — input rejected locally, before any request
/// - [`Error::Parse`] — URL parsing failures
/// - [`Error::Build`] — construction of the client failed
/// - [`Error::Io`] — local file access (session store, image uploads)
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed (transport, server, JSON).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// Session missing, rejected or expired.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// Input rejected client-side; no request was issued.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// URL parsing failed while preparing a request.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Building the client failed.
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),

    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short text suitable for a notification shown to the viewer.
    ///
    /// Prefers the server's own `message`; falls back to a generic phrase for
    /// transport problems.
    pub fn user_message(&self) -> String {
        match self {
            Error::Request(RequestError::Server { message, .. })
            | Error::Request(RequestError::Rejected { message }) => message.clone(),
            Error::Request(RequestError::Transport(_)) => {
                "Could not reach the server".to_string()
            }
            Error::Request(RequestError::DecodeJson { .. }) => {
                "Unexpected response from the server".to_string()
            }
            Error::Authentication(e) => e.to_string(),
            Error::Validation(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the server rejected the bearer token (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Request(RequestError::Server { status, .. })
                if *status == reqwest::StatusCode::UNAUTHORIZED
        )
    }
}

// --- Consolidated Authentication Error ---

/// Errors originating from the session lifecycle.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An operation needing a session was attempted without one.
    #[error("You need to log in first")]
    NotAuthenticated,

    /// Login was answered without the user or token it must carry.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The server no longer accepts the stored token.
    #[error("Your session has expired")]
    SessionExpired,

    /// Reading or writing the persisted session failed.
    #[error("Session storage failed: {0}")]
    Store(String),
}

// --- Consolidated Request Error ---

/// Transport and server-side HTTP errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-success status.
    #[error("Server responded with an error: {status} - {message}")]
    Server {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// The reply's `message` field, or the raw body when it has none.
        message: String,
    },

    /// A 2xx reply whose `status` field is not `"success"`.
    #[error("Server rejected the request: {message}")]
    Rejected {
        /// The reply's `message` field.
        message: String,
    },

    /// JSON decoding failed when parsing a server response.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON deserializer.
        message: String,
    },
}

// --- Local Validation Error ---

/// Input rejected before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Publication text is empty or only whitespace.
    #[error("Write something before publishing")]
    EmptyText,

    /// Publication text exceeds the limit.
    #[error("Publications are limited to {MAX_PUBLICATION_CHARS} characters ({0} given)")]
    TextTooLong(usize),

    /// A user tried to follow themselves.
    #[error("You cannot follow yourself")]
    SelfFollow,

    /// Any other malformed argument.
    #[error("{0}")]
    Invalid(String),
}

/// A specialized `Result` type for `social` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

impl_from_for_error!(reqwest::Error, Error::Request);

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Request(RequestError::DecodeJson {
            message: err.to_string(),
        })
    }
}
