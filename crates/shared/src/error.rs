use thiserror::Error;

use crate::protocol::CommandKind;

/// Failure to turn a decoded reply envelope into a typed [`crate::protocol::Reply`].
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("unknown reply status `{0}`")]
    UnknownStatus(String),
    #[error("malformed {kind} payload: {source}")]
    Payload {
        kind: CommandKind,
        #[source]
        source: serde_json::Error,
    },
}
