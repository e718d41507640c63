//! Error types for the myFlix client.
//!
//! This module defines the centralized error type [`MyflixError`] and a type alias
//! [`Result`] used throughout the crate. Every outcome of a remote call is delivered
//! as a value of this type; nothing in the client panics on a failed request.

use thiserror::Error;

/// Message shown to the user for any failed network round trip.
///
/// The underlying status and body stay on the error value for logging.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong; please try again later.";

/// The main error type for myFlix client operations.
///
/// Remote failures keep the raw status and body so they can be logged, while
/// [`MyflixError::user_message`] collapses them into one generic message for display.
///
/// # Examples
///
/// ```
/// use myflix::MyflixError;
///
/// let err = MyflixError::Remote { status: 500, body: "boom".to_string() };
/// assert_eq!(err.user_message(), "Something went wrong; please try again later.");
/// assert_eq!(err.status(), Some(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MyflixError {
    /// No token is present for an endpoint that requires one.
    ///
    /// Raised by the gateway before any request is built, so the network is
    /// never touched.
    #[error("user is not authenticated")]
    Unauthenticated,

    /// The server answered with a non-2xx status.
    #[error("remote call failed with status {status}: {body}")]
    Remote {
        /// HTTP status code returned by the server.
        status: u16,
        /// Raw response body, preserved for logging.
        body: String,
    },

    /// The request never produced a response (connection, timeout, decoding).
    #[error("transport error: {0}")]
    Transport(String),

    /// A lookup by name or id produced no match.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Kind of record that was looked up (`movie`, `genre`, `director`).
        kind: &'static str,
        /// The name or id that was looked up.
        key: String,
    },

    /// A movie name addresses more than one catalog entry.
    ///
    /// Favorites are mutated on the server by movie name while the user record
    /// stores ids, so a duplicated name cannot be resolved safely.
    #[error("movie name {name:?} matches {count} catalog entries")]
    AmbiguousName {
        /// The duplicated movie name.
        name: String,
        /// Number of catalog entries carrying that name.
        count: usize,
    },

    /// An operation was requested in a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Reading or writing the durable session slots failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem operation failed.
    ///
    /// Stored as a message so the error stays `Clone` for replay into view state.
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration is invalid or missing.
    #[error("configuration error: {0}")]
    Config(String),
}

impl MyflixError {
    /// Returns the message suitable for showing to the user.
    ///
    /// All network failures collapse into [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote { .. } | Self::Transport(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            Self::Unauthenticated => "User is not authenticated".to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a remote failure, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the session token.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Remote { status: 401, .. })
    }
}

impl From<std::io::Error> for MyflixError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for MyflixError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A specialized `Result` type for myFlix client operations.
pub type Result<T> = std::result::Result<T, MyflixError>;
