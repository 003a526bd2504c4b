use async_trait::async_trait;
use client_core::{MessageBox, Notifier};
use tokio::sync::Mutex;

/// Collects message boxes raised during an exchange until the page controller
/// renders them into the notifier anchor.
#[derive(Default)]
pub struct MessageOutbox {
    pending: Mutex<Vec<MessageBox>>,
}

impl MessageOutbox {
    pub async fn drain(&self) -> Vec<MessageBox> {
        std::mem::take(&mut *self.pending.lock().await)
    }
}

#[async_trait]
impl Notifier for MessageOutbox {
    async fn show_message_box(&self, message: MessageBox) {
        self.pending.lock().await.push(message);
    }
}
