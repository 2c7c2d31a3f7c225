//! Error types for the appliance client.

use std::fmt;

use aerofs_transfer::TransferError;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// A response the appliance answered with a status of 300 or above.
///
/// Status, headers and body are kept so callers can diagnose the failure.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiError {
    /// Canonical reason phrase for the status, if known.
    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Body as lossy UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {} {}", self.status.as_u16(), self.reason())?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body_text())?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Errors from the appliance client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be built (bad header value, bad URL, bad
    /// argument combination).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP error: {0}")]
    Transport(reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Status(Box<ApiError>),

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed {header} header: {value:?}")]
    Parse { header: &'static str, value: String },

    #[error("transfer error: {0}")]
    Transfer(TransferError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Request,
    Transport,
    Protocol,
    Decode,
    Parse,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRequest(_) => ErrorKind::Request,
            Error::Transport(_) | Error::Timeout | Error::Cancelled => ErrorKind::Transport,
            Error::Status(_) => ErrorKind::Protocol,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Transfer(_) | Error::Io(_) => ErrorKind::Io,
        }
    }

    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status(api) => Some(api.status),
            _ => None,
        }
    }

    /// The failed response, when the appliance produced one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Status(api) => Some(api),
            _ => None,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout => true,
            Error::Status(api) => {
                matches!(api.status.as_u16(), 408 | 409 | 412 | 429) || api.status.is_server_error()
            }
            _ => false,
        }
    }

    /// `304 Not Modified` answer to an `If-None-Match` request.
    pub fn is_not_modified(&self) -> bool {
        self.status() == Some(StatusCode::NOT_MODIFIED)
    }

    /// `412 Precondition Failed`, usually a stale entity tag.
    pub fn is_precondition_failed(&self) -> bool {
        self.status() == Some(StatusCode::PRECONDITION_FAILED)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Status(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Transport(err)
        }
    }
}

impl From<TransferError> for Error {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::MalformedHeader { header, value } => Error::Parse { header, value },
            other => Error::Transfer(other),
        }
    }
}
