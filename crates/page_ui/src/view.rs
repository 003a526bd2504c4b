//! The slot filter view: owns the UI state, renders the filter bar from it,
//! and issues the commands that refill it.

use std::sync::Arc;

use async_trait::async_trait;
use client_core::{CommandSender, DispatchError, StateSink, StateUpdate};
use shared::{
    domain::{Slot, User},
    protocol::Command,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    app_root::{Anchor, ApplicationRoot},
    dom::Element,
    error::PageError,
    factory::{new_element, new_select, new_text_input, OptionMap},
};

pub const ALL_USERS_KEY: &str = "all";
pub const ALL_USERS_LABEL: &str = "All";
pub const USER_FILTER_ID: &str = "slotUserFilter";
pub const FROM_FILTER_ID: &str = "slotFromFilter";
pub const TO_FILTER_ID: &str = "slotToFilter";
pub const SEARCH_BUTTON_ID: &str = "slotSearchButton";

const FILTER_CLASS: &str = "quarterWidth flexCenter";
const BAR_CLASS: &str = "allWidth flexCenter";
const OK_MESSAGE: &str = "Ok";

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub users: Vec<User>,
    pub slots: Vec<Slot>,
    pub error_message: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            slots: Vec::new(),
            error_message: OK_MESSAGE.to_string(),
        }
    }
}

impl UiState {
    /// Replaces the fields present in `update`; the rest are kept.
    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(users) = update.users {
            self.users = users;
        }
        if let Some(slots) = update.slots {
            self.slots = slots;
        }
        if let Some(message) = update.error_message {
            self.error_message = message;
        }
    }
}

/// Shared handle to a view's [`UiState`]; this is the state-update entry
/// point handed to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    inner: Arc<Mutex<UiState>>,
}

impl ViewState {
    pub async fn snapshot(&self) -> UiState {
        self.inner.lock().await.clone()
    }

    async fn reset(&self) {
        *self.inner.lock().await = UiState::default();
    }
}

#[async_trait]
impl StateSink for ViewState {
    async fn set_state(&self, update: StateUpdate) {
        self.inner.lock().await.apply(update);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
}

#[derive(Debug)]
pub struct FilterView {
    state: ViewState,
    lifecycle: Lifecycle,
}

impl Default for FilterView {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterView {
    pub fn new() -> Self {
        Self {
            state: ViewState::default(),
            lifecycle: Lifecycle::Unmounted,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Resets state, asks for the user list and renders into the display
    /// anchor. A failed user request is recorded in the error message only.
    pub async fn mount(
        &mut self,
        root: &mut ApplicationRoot,
        sender: &dyn CommandSender,
    ) -> Result<(), PageError> {
        self.state.reset().await;
        self.lifecycle = Lifecycle::Mounted;
        if let Err(err) = self.dispatch(Command::users(), sender).await {
            warn!("view: initial user listing failed: {err}");
        }
        self.refresh(root).await
    }

    pub fn unmount(&mut self, root: &mut ApplicationRoot) -> Result<(), PageError> {
        self.lifecycle = Lifecycle::Unmounted;
        root.anchor_mut(Anchor::Display)?.clear_children();
        Ok(())
    }

    /// Asks for slots scoped to whatever the rendered user dropdown shows now.
    pub async fn request_slots(
        &self,
        root: &ApplicationRoot,
        sender: &dyn CommandSender,
    ) -> Result<(), PageError> {
        let user = root
            .anchor(Anchor::Display)?
            .find_by_id(USER_FILTER_ID)
            .ok_or(PageError::MissingElement(USER_FILTER_ID))?
            .current_value();
        self.dispatch(Command::slots(user), sender).await?;
        Ok(())
    }

    pub async fn retry(&self, sender: &dyn CommandSender) -> Result<(), PageError> {
        let outcome = sender.resend(&self.state).await;
        self.record(outcome).await?;
        Ok(())
    }

    /// Re-renders the filter bar into the display anchor, keeping the values
    /// the user already entered. No-op while unmounted.
    pub async fn refresh(&self, root: &mut ApplicationRoot) -> Result<(), PageError> {
        if self.lifecycle != Lifecycle::Mounted {
            return Ok(());
        }
        let snapshot = self.state.snapshot().await;
        let mut bar = render_filter_bar(&snapshot);
        let display = root.anchor_mut(Anchor::Display)?;
        carry_over_inputs(display, &mut bar);
        display.clear_children();
        display.append(bar);
        Ok(())
    }

    async fn dispatch(
        &self,
        command: Command,
        sender: &dyn CommandSender,
    ) -> Result<(), DispatchError> {
        debug!(command = %command.command, "view: dispatching");
        let outcome = sender.send(command, &self.state).await;
        self.record(outcome).await
    }

    async fn record(&self, outcome: Result<(), DispatchError>) -> Result<(), DispatchError> {
        if let Err(err) = &outcome {
            self.state
                .set_state(StateUpdate::error_message(err.to_string()))
                .await;
        }
        outcome
    }
}

/// Builds the filter bar for `state`. Pure: reads nothing from the page.
pub fn render_filter_bar(state: &UiState) -> Element {
    let mut user_options = OptionMap::new();
    user_options.insert(ALL_USERS_KEY, ALL_USERS_LABEL);
    for user in &state.users {
        user_options.insert(user.id.to_string(), user.full_name());
    }

    let user_select = new_select(Some(USER_FILTER_ID), Some(FILTER_CLASS), &user_options);
    let from_input = new_text_input(Some(FROM_FILTER_ID), Some(FILTER_CLASS), None);
    let to_input = new_text_input(Some(TO_FILTER_ID), Some(FILTER_CLASS), None);
    let search_button = new_element("div", Some(SEARCH_BUTTON_ID), Some(FILTER_CLASS), None);

    let mut search_bar = new_element("div", None, Some(BAR_CLASS), None);
    search_bar.append_all([user_select, from_input, to_input, search_button]);
    search_bar
}

fn carry_over_inputs(previous: &Element, next: &mut Element) {
    for id in [USER_FILTER_ID, FROM_FILTER_ID, TO_FILTER_ID] {
        let Some(old) = previous.find_by_id(id).filter(|old| old.has_explicit_value()) else {
            continue;
        };
        let Some(new) = next.find_by_id_mut(id) else {
            continue;
        };
        let value = old.current_value();
        if new.tag() == "select" {
            new.select_option(&value);
        } else {
            new.set_value(value);
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
