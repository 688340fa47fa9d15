//! Decode errors for queue replies and queue items

use thiserror::Error;

/// Errors raised while decoding payloads received from the queue service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The reply body is not valid JSON
    #[error("could not parse reply: {0}")]
    InvalidJson(String),

    /// The reply carries neither `return_code` nor `success`
    #[error("no recognizable status field")]
    MissingStatus,

    /// The status field is present but not a usable boolean
    #[error("invalid return code")]
    InvalidReturnCode,

    /// The reply decoded but its content has the wrong type
    #[error("unexpected reply content: {0}")]
    InvalidContent(String),

    /// A queue item is missing a field or one of its fields is not JSON
    #[error("unexpected reply from server: {0}")]
    MalformedItem(String),
}
