//! Page model and the slot filter view: element tree, element factory,
//! application root, and the event-driven page controller.

pub mod app_root;
pub mod controller;
pub mod dom;
pub mod error;
pub mod factory;
pub mod notify;
pub mod view;

pub use app_root::{Anchor, ApplicationRoot};
pub use controller::{events::UiEvent, Page};
pub use dom::{Document, Element};
pub use error::PageError;
pub use notify::MessageOutbox;
pub use view::{FilterView, UiState, ViewState};
