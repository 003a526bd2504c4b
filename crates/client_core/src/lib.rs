//! Client side of the `/xhr` exchange: the request dispatcher, the seams it
//! talks through, and client settings.

use async_trait::async_trait;
use shared::{
    domain::{Slot, User},
    protocol::Command,
};
use tracing::warn;

pub mod config;
pub mod dispatcher;
pub mod error;

pub use dispatcher::{Dispatcher, REQUEST_TIMEOUT, XHR_PATH};
pub use error::DispatchError;

/// Partial update of a view's state. `None` fields leave the current value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub users: Option<Vec<User>>,
    pub slots: Option<Vec<Slot>>,
    pub error_message: Option<String>,
}

impl StateUpdate {
    pub fn users(users: Vec<User>) -> Self {
        Self {
            users: Some(users),
            ..Self::default()
        }
    }

    pub fn slots(slots: Vec<Slot>) -> Self {
        Self {
            slots: Some(slots),
            ..Self::default()
        }
    }

    pub fn error_message(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_none() && self.slots.is_none() && self.error_message.is_none()
    }
}

/// State-update entry point of whatever owns the UI state.
#[async_trait]
pub trait StateSink: Send + Sync {
    async fn set_state(&self, update: StateUpdate);
}

/// User-visible notice raised when the server answers with a failure status.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBox {
    pub text: String,
    /// Command that failed; retrying re-issues it.
    pub retry: Option<Command>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show_message_box(&self, message: MessageBox);
}

/// Notifier for hosts without a place to show message boxes.
pub struct LogOnlyNotifier;

#[async_trait]
impl Notifier for LogOnlyNotifier {
    async fn show_message_box(&self, message: MessageBox) {
        warn!(text = %message.text, retryable = message.retry.is_some(), "message box suppressed");
    }
}

/// Anything that can carry a [`Command`] to the server and route the reply.
#[async_trait]
pub trait CommandSender: Send + Sync {
    async fn send(&self, command: Command, sink: &dyn StateSink) -> Result<(), DispatchError>;

    /// Re-issues the most recent command.
    async fn resend(&self, sink: &dyn StateSink) -> Result<(), DispatchError>;
}
