//! Error types for the queue client

use thiserror::Error;
use xqueue_core::DecodeError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the queue service
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached (DNS, refused, unreachable)
    #[error("cannot connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-2xx status (after the trailing-slash retry)
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        url: String,
    },

    /// Any other HTTP-level failure
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The reply body could not be decoded
    #[error("could not decode reply: {0}")]
    Decode(#[from] DecodeError),

    /// The reply decoded fine but reports a logical failure
    #[error("queue service reported failure: {0}")]
    SoftFailure(String),

    /// A queue operation was attempted before logging in
    #[error("no authenticated session")]
    NotAuthenticated,
}

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    SoftFailure,
    Session,
}

impl ClientError {
    /// Maps a reqwest error raised while sending a request to `url`
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                source: err,
            }
        } else {
            Self::RequestFailed(err)
        }
    }

    pub(crate) fn unexpected_status(status: u16, url: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            url: url.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connect { .. }
            | Self::Timeout { .. }
            | Self::UnexpectedStatus { .. }
            | Self::RequestFailed(_) => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            Self::SoftFailure(_) => ErrorKind::SoftFailure,
            Self::NotAuthenticated => ErrorKind::Session,
        }
    }

    /// Check if this error happened at the transport level
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status, .. } if *status >= 500)
    }

    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ClientError::unexpected_status(404, "http://x/").kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            ClientError::Timeout { url: "http://x/".into() }.kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            ClientError::from(DecodeError::MissingStatus).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            ClientError::SoftFailure("invalid return code".into()).kind(),
            ErrorKind::SoftFailure
        );
        assert_eq!(ClientError::NotAuthenticated.kind(), ErrorKind::Session);
    }

    #[test]
    fn test_status_helpers() {
        let err = ClientError::unexpected_status(500, "http://x/login");
        assert!(err.is_server_error());
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "unexpected status 500 from http://x/login");

        let err = ClientError::unexpected_status(403, "http://x/login");
        assert!(!err.is_server_error());
        assert_eq!(ClientError::NotAuthenticated.status(), None);
    }
}
