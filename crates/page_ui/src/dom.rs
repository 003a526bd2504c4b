//! Minimal page model: a tree of elements addressed by id and serialisable
//! to HTML markup.

use std::fmt::Write as _;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    class_name: Option<String>,
    inner_html: Option<String>,
    inner_text: Option<String>,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class_name: None,
            inner_html: None,
            inner_text: None,
            attributes: Vec::new(),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = Some(class_name.into());
    }

    pub fn inner_html(&self) -> Option<&str> {
        self.inner_html.as_deref()
    }

    /// Replaces any text content; markup is emitted verbatim.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_text = None;
        self.inner_html = Some(html.into());
    }

    pub fn inner_text(&self) -> Option<&str> {
        self.inner_text.as_deref()
    }

    pub fn set_inner_text(&mut self, text: impl Into<String>) {
        self.inner_html = None;
        self.inner_text = Some(text.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Current value as an input control would report it. A `select` with no
    /// explicit choice reports its first option.
    pub fn current_value(&self) -> String {
        if let Some(value) = &self.value {
            return value.clone();
        }
        if self.tag == "select" {
            return self
                .options()
                .next()
                .and_then(|option| option.attribute("value"))
                .unwrap_or_default()
                .to_string();
        }
        String::new()
    }

    pub fn has_explicit_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Chooses the option with the given key. Unknown keys leave the
    /// selection unchanged and return `false`.
    pub fn select_option(&mut self, key: &str) -> bool {
        let known = self
            .options()
            .any(|option| option.attribute("value") == Some(key));
        if known {
            self.value = Some(key.to_string());
        }
        known
    }

    pub fn options(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(|child| child.tag == "option")
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn append_all(&mut self, children: impl IntoIterator<Item = Element>) {
        self.children.extend(children);
    }

    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, None);
        out
    }

    fn write_html(&self, out: &mut String, selected: Option<&str>) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape(id));
        }
        if let Some(class_name) = &self.class_name {
            let _ = write!(out, " class=\"{}\"", escape(class_name));
        }
        for (name, value) in &self.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.tag == "input" {
            if let Some(value) = &self.value {
                let _ = write!(out, " value=\"{}\"", escape(value));
            }
        }
        if self.tag == "option" && selected.is_some() && self.attribute("value") == selected {
            out.push_str(" selected");
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        if let Some(html) = &self.inner_html {
            out.push_str(html);
        } else if let Some(text) = &self.inner_text {
            out.push_str(&escape(text));
        }

        let chosen = if self.tag == "select" {
            self.value.as_deref()
        } else {
            None
        };
        for child in &self.children {
            child.write_html(out, chosen);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// The hosting page. Owns the element tree rooted at `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    body: Element,
}

impl Document {
    pub fn new(body: Element) -> Self {
        Self { body }
    }

    /// Page skeleton exposing the anchors the application root expects.
    pub fn host_page() -> Self {
        let mut navigation = Element::new("ul");
        navigation.set_id("navigation");
        let mut controls = Element::new("div");
        controls.set_id("controls");
        let mut header = Element::new("header");
        header.append_all([navigation, controls]);

        let mut display = Element::new("main");
        display.set_id("appDisplay");

        let mut notifier = Element::new("div");
        notifier.set_id("appFooterRight");
        let mut footer = Element::new("footer");
        footer.append(notifier);

        let mut body = Element::new("body");
        body.append_all([header, display, footer]);
        Self::new(body)
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.body.find_by_id(id)
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.find_by_id_mut(id)
    }

    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n<html>{}</html>\n", self.body.to_html())
    }
}
