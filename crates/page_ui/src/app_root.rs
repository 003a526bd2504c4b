use client_core::MessageBox;
use tracing::debug;

use crate::{
    dom::{Document, Element},
    error::PageError,
    factory::new_element,
};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const MESSAGE_BOX_RETRY_ID: &str = "messageBoxRetry";

const NAVIGATION_TAB_LABEL: &str = "Basics";
const NAVIGATION_TAB_CLASS: &str = "navControl flexCenter";

/// Named regions of the host page the application renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Display,
    Notifier,
    Navigation,
    Controls,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [
        Anchor::Display,
        Anchor::Notifier,
        Anchor::Navigation,
        Anchor::Controls,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Self::Display => "appDisplay",
            Self::Notifier => "appFooterRight",
            Self::Navigation => "navigation",
            Self::Controls => "controls",
        }
    }
}

/// Owner of the host page. Built once at start-up and handed to the views
/// that render into it.
#[derive(Debug)]
pub struct ApplicationRoot {
    document: Document,
    language: String,
}

impl ApplicationRoot {
    pub fn new(document: Document) -> Result<Self, PageError> {
        Self::with_language(document, DEFAULT_LANGUAGE)
    }

    pub fn with_language(
        mut document: Document,
        language: impl Into<String>,
    ) -> Result<Self, PageError> {
        if let Some(missing) = Anchor::ALL
            .into_iter()
            .find(|anchor| document.element_by_id(anchor.element_id()).is_none())
        {
            return Err(PageError::MissingAnchor(missing.element_id()));
        }

        let mut tab = new_element("li", None, Some(NAVIGATION_TAB_CLASS), None);
        tab.set_inner_text(NAVIGATION_TAB_LABEL);
        document
            .element_by_id_mut(Anchor::Navigation.element_id())
            .ok_or(PageError::MissingAnchor(Anchor::Navigation.element_id()))?
            .append(tab);

        Ok(Self {
            document,
            language: language.into(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn anchor(&self, anchor: Anchor) -> Result<&Element, PageError> {
        self.document
            .element_by_id(anchor.element_id())
            .ok_or(PageError::MissingAnchor(anchor.element_id()))
    }

    pub fn anchor_mut(&mut self, anchor: Anchor) -> Result<&mut Element, PageError> {
        self.document
            .element_by_id_mut(anchor.element_id())
            .ok_or(PageError::MissingAnchor(anchor.element_id()))
    }

    pub fn show_message_box(&mut self, message: &MessageBox) -> Result<(), PageError> {
        debug!(text = %message.text, "page: showing message box");
        let mut container = new_element("div", None, Some("messageBox flexCenter"), None);
        let mut text = new_element("span", None, Some("messageBoxText"), None);
        text.set_inner_text(message.text.as_str());
        container.append(text);
        if message.retry.is_some() {
            let mut retry = new_element(
                "div",
                Some(MESSAGE_BOX_RETRY_ID),
                Some("messageBoxRetry flexCenter"),
                None,
            );
            retry.set_inner_text("Retry");
            container.append(retry);
        }
        self.anchor_mut(Anchor::Notifier)?.append(container);
        Ok(())
    }

    pub fn clear_message_boxes(&mut self) -> Result<(), PageError> {
        self.anchor_mut(Anchor::Notifier)?.clear_children();
        Ok(())
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}
