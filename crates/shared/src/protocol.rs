use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Slot, User},
    error::ReplyError,
};

pub const STATUS_OK: &str = "ok";
pub const STATUS_ERROR: &str = "error";

const UNSPECIFIED_SERVER_ERROR: &str = "server reported an error without details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Users,
    Slots,
    Add,
    Delete,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Slots => "slots",
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body posted to `/xhr`.
///
/// `data` is always written and reads back as `null` when absent; `user` is
/// only written when a user scope is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub command: CommandKind,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Command {
    pub fn users() -> Self {
        Self {
            command: CommandKind::Users,
            data: Value::Null,
            user: None,
        }
    }

    /// Slot listing scoped to a user key, or `"all"`.
    pub fn slots(user: impl Into<String>) -> Self {
        Self {
            command: CommandKind::Slots,
            data: Value::Null,
            user: Some(user.into()),
        }
    }

    pub fn add(data: Value) -> Self {
        Self {
            command: CommandKind::Add,
            data,
            user: None,
        }
    }

    pub fn delete(data: Value) -> Self {
        Self {
            command: CommandKind::Delete,
            data,
            user: None,
        }
    }
}

/// Reply exactly as decoded from the wire.
///
/// `status` is the outcome; `kind` names the command being answered and is
/// optional so older servers that never send it still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CommandKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplyEnvelope {
    pub fn ok(kind: CommandKind, data: Value) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            kind: Some(kind),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            kind: None,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Types the envelope. `answered` is the kind of the command this reply
    /// belongs to and is used when the envelope carries no `kind` of its own.
    pub fn into_reply(self, answered: CommandKind) -> Result<Reply, ReplyError> {
        match self.status.as_str() {
            STATUS_OK => {
                let kind = self.kind.unwrap_or(answered);
                ReplyPayload::decode(kind, self.data).map(Reply::Ok)
            }
            STATUS_ERROR => {
                let message = self
                    .error
                    .filter(|message| !message.is_empty())
                    .or_else(|| match self.data {
                        Some(Value::String(text)) => Some(text),
                        _ => None,
                    })
                    .unwrap_or_else(|| UNSPECIFIED_SERVER_ERROR.to_string());
                Ok(Reply::Error(message))
            }
            _ => Err(ReplyError::UnknownStatus(self.status.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok(ReplyPayload),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPayload {
    Users(Vec<User>),
    Slots(Vec<Slot>),
    Add(Option<Value>),
    Delete(Option<Value>),
}

impl ReplyPayload {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Users(_) => CommandKind::Users,
            Self::Slots(_) => CommandKind::Slots,
            Self::Add(_) => CommandKind::Add,
            Self::Delete(_) => CommandKind::Delete,
        }
    }

    fn decode(kind: CommandKind, data: Option<Value>) -> Result<Self, ReplyError> {
        match kind {
            CommandKind::Users => decode_list(kind, data).map(Self::Users),
            CommandKind::Slots => decode_list(kind, data).map(Self::Slots),
            CommandKind::Add => Ok(Self::Add(data)),
            CommandKind::Delete => Ok(Self::Delete(data)),
        }
    }
}

// An empty listing is encoded as `null` by the server.
fn decode_list<T: DeserializeOwned>(
    kind: CommandKind,
    data: Option<Value>,
) -> Result<Vec<T>, ReplyError> {
    match data {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => {
            serde_json::from_value(value).map_err(|source| ReplyError::Payload { kind, source })
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
