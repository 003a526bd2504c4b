//! Controller layer: turns page events into view actions and keeps the page
//! rendered after each one.

pub mod events;

use std::sync::Arc;

use client_core::CommandSender;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    app_root::{Anchor, ApplicationRoot},
    error::PageError,
    notify::MessageOutbox,
    view::{FilterView, FROM_FILTER_ID, TO_FILTER_ID, USER_FILTER_ID},
};
use events::UiEvent;

pub struct Page {
    root: ApplicationRoot,
    view: FilterView,
    sender: Arc<dyn CommandSender>,
    outbox: Arc<MessageOutbox>,
}

impl Page {
    /// `outbox` must be the notifier the sender reports message boxes to.
    pub fn new(
        root: ApplicationRoot,
        sender: Arc<dyn CommandSender>,
        outbox: Arc<MessageOutbox>,
    ) -> Self {
        Self {
            root,
            view: FilterView::new(),
            sender,
            outbox,
        }
    }

    pub fn root(&self) -> &ApplicationRoot {
        &self.root
    }

    pub fn view(&self) -> &FilterView {
        &self.view
    }

    /// Handles one event, then re-renders and shows pending message boxes
    /// whether or not the event itself failed.
    pub async fn handle(&mut self, event: UiEvent) -> Result<(), PageError> {
        debug!(event = event.name(), "page: handling event");
        let sender = Arc::clone(&self.sender);
        let outcome = match event {
            UiEvent::Mount => self.view.mount(&mut self.root, sender.as_ref()).await,
            UiEvent::Unmount => self.view.unmount(&mut self.root),
            UiEvent::UserFilterChanged(value) => self.choose_user(&value),
            UiEvent::FromChanged(text) => self.set_text(FROM_FILTER_ID, text),
            UiEvent::ToChanged(text) => self.set_text(TO_FILTER_ID, text),
            UiEvent::SearchClicked => self.view.request_slots(&self.root, sender.as_ref()).await,
            UiEvent::RetryClicked => match self.root.clear_message_boxes() {
                Ok(()) => self.view.retry(sender.as_ref()).await,
                Err(err) => Err(err),
            },
        };

        let rendered = self.view.refresh(&mut self.root).await;
        for message in self.outbox.drain().await {
            self.root.show_message_box(&message)?;
        }
        outcome.and(rendered)
    }

    /// Processes events until the channel closes. Failures are logged; the
    /// page stays usable.
    pub async fn run(&mut self, mut events: mpsc::Receiver<UiEvent>) {
        while let Some(event) = events.recv().await {
            let name = event.name();
            if let Err(err) = self.handle(event).await {
                warn!(event = name, "page: {err}");
            }
        }
    }

    fn choose_user(&mut self, value: &str) -> Result<(), PageError> {
        let select = self
            .root
            .anchor_mut(Anchor::Display)?
            .find_by_id_mut(USER_FILTER_ID)
            .ok_or(PageError::MissingElement(USER_FILTER_ID))?;
        if select.select_option(value) {
            Ok(())
        } else {
            Err(PageError::UnknownOption {
                element: USER_FILTER_ID,
                value: value.to_string(),
            })
        }
    }

    fn set_text(&mut self, id: &'static str, text: String) -> Result<(), PageError> {
        self.root
            .anchor_mut(Anchor::Display)?
            .find_by_id_mut(id)
            .ok_or(PageError::MissingElement(id))?
            .set_value(text);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
