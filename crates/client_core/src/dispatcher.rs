use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::protocol::{Command, Reply, ReplyEnvelope, ReplyPayload};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
    config::Settings, CommandSender, DispatchError, MessageBox, Notifier, StateSink, StateUpdate,
};

pub const XHR_PATH: &str = "/xhr";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Posts commands to the server's `/xhr` endpoint and routes each reply to a
/// [`StateSink`].
///
/// Every call is one independent exchange; overlapping calls are neither
/// de-duplicated nor ordered.
pub struct Dispatcher {
    http: Client,
    endpoint: Url,
    timeout: Duration,
    notifier: Arc<dyn Notifier>,
    last_command: Mutex<Option<Command>>,
}

impl Dispatcher {
    pub fn new(server_url: &str, notifier: Arc<dyn Notifier>) -> Result<Self, DispatchError> {
        Self::with_timeout(server_url, REQUEST_TIMEOUT, notifier)
    }

    pub fn from_settings(
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, DispatchError> {
        Self::with_timeout(&settings.server_url, settings.request_timeout(), notifier)
    }

    pub fn with_timeout(
        server_url: &str,
        timeout: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, DispatchError> {
        let endpoint = xhr_endpoint(server_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DispatchError::Network(err.to_string()))?;
        Ok(Self {
            http,
            endpoint,
            timeout,
            notifier,
            last_command: Mutex::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn last_command(&self) -> Option<Command> {
        self.last_command.lock().await.clone()
    }

    async fn exchange(&self, command: &Command) -> Result<Reply, DispatchError> {
        let body =
            serde_json::to_string(command).map_err(|err| DispatchError::Encode(err.to_string()))?;
        debug!(command = %command.command, user = ?command.user, "xhr: sending");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or_default().to_string();
            error!(
                command = %command.command,
                status = status.as_u16(),
                "xhr: server answered {status_text}"
            );
            self.notifier
                .show_message_box(MessageBox {
                    text: status_message(status.as_u16(), &status_text),
                    retry: Some(command.clone()),
                })
                .await;
            return Err(DispatchError::Transport {
                status: status.as_u16(),
                status_text,
            });
        }

        let text = response.text().await.map_err(|err| self.classify(err))?;
        info!(
            command = %command.command,
            kbytes = (text.len() + 512) / 1024,
            "xhr: reply received"
        );
        let envelope: ReplyEnvelope =
            serde_json::from_str(&text).map_err(|err| DispatchError::Decode(err.to_string()))?;
        Ok(envelope.into_reply(command.command)?)
    }

    fn classify(&self, err: reqwest::Error) -> DispatchError {
        if err.is_timeout() {
            DispatchError::Timeout(self.timeout)
        } else {
            DispatchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl CommandSender for Dispatcher {
    async fn send(&self, command: Command, sink: &dyn StateSink) -> Result<(), DispatchError> {
        *self.last_command.lock().await = Some(command.clone());

        let outcome = match self.exchange(&command).await {
            Ok(reply) => route(reply, sink).await,
            Err(err) => Err(err),
        };
        if let Err(err) = &outcome {
            match err {
                DispatchError::Timeout(_) => warn!(command = %command.command, "xhr: request timed out"),
                DispatchError::Application(message) => {
                    warn!(command = %command.command, "xhr: server error: {message}")
                }
                other => error!(command = %command.command, "xhr: {other}"),
            }
        }
        outcome
    }

    async fn resend(&self, sink: &dyn StateSink) -> Result<(), DispatchError> {
        let command = self
            .last_command()
            .await
            .ok_or(DispatchError::NothingToResend)?;
        info!(command = %command.command, "xhr: re-sending last command");
        self.send(command, sink).await
    }
}

async fn route(reply: Reply, sink: &dyn StateSink) -> Result<(), DispatchError> {
    match reply {
        Reply::Ok(ReplyPayload::Users(users)) => {
            sink.set_state(StateUpdate::users(users)).await;
            Ok(())
        }
        Reply::Ok(ReplyPayload::Slots(slots)) => {
            sink.set_state(StateUpdate::slots(slots)).await;
            Ok(())
        }
        Reply::Ok(payload) => {
            debug!(kind = %payload.kind(), "xhr: reply carries no view update");
            Ok(())
        }
        Reply::Error(message) => Err(DispatchError::Application(message)),
    }
}

// Status text as the transport reports it; bare code when there is none.
fn status_message(status: u16, status_text: &str) -> String {
    if status_text.is_empty() {
        status.to_string()
    } else {
        status_text.to_string()
    }
}

fn xhr_endpoint(server_url: &str) -> Result<Url, DispatchError> {
    let invalid = |reason: String| DispatchError::InvalidServerUrl {
        url: server_url.to_string(),
        reason,
    };
    let base = Url::parse(server_url.trim()).map_err(|err| invalid(err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("not a base url".to_string()));
    }
    base.join(XHR_PATH).map_err(|err| invalid(err.to_string()))
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
