use std::time::Duration;

use shared::error::ReplyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("server answered {status} {status_text}")]
    Transport { status: u16, status_text: String },
    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
    #[error("network failure: {0}")]
    Network(String),
    #[error("server error: {0}")]
    Application(String),
    #[error("unknown reply: {0}")]
    UnknownReply(String),
    #[error("undecodable reply: {0}")]
    Decode(String),
    #[error("unable to encode command: {0}")]
    Encode(String),
    #[error("invalid server url `{url}`: {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("no command has been sent yet")]
    NothingToResend,
}

impl DispatchError {
    /// Only failure statuses reported by the server offer a retry to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl From<ReplyError> for DispatchError {
    fn from(value: ReplyError) -> Self {
        match value {
            ReplyError::UnknownStatus(status) => Self::UnknownReply(status),
            payload @ ReplyError::Payload { .. } => Self::Decode(payload.to_string()),
        }
    }
}
