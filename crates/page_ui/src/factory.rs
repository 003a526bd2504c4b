//! Element factory helpers. Absent or empty optional parameters are skipped.

use crate::dom::Element;

/// Option key to label mapping that keeps insertion order.
///
/// Re-inserting a key replaces its label without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(String, String)>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        let key = key.into();
        let label = label.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((key, label)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, label)| (key.as_str(), label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, label) in iter {
            map.insert(key, label);
        }
        map
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

pub fn new_element(
    tag: &str,
    id: Option<&str>,
    class_name: Option<&str>,
    html: Option<&str>,
) -> Element {
    let mut element = Element::new(tag);
    if let Some(id) = provided(id) {
        element.set_id(id);
    }
    if let Some(class_name) = provided(class_name) {
        element.set_class_name(class_name);
    }
    if let Some(html) = provided(html) {
        element.set_inner_html(html);
    }
    element
}

pub fn new_select(id: Option<&str>, class_name: Option<&str>, options: &OptionMap) -> Element {
    let mut select = new_element("select", id, class_name, None);
    for (key, label) in options.iter() {
        let mut option = Element::new("option");
        option.set_attribute("value", key);
        option.set_inner_text(label);
        select.append(option);
    }
    select
}

pub fn new_text_input(
    id: Option<&str>,
    class_name: Option<&str>,
    placeholder: Option<&str>,
) -> Element {
    let mut input = new_element("input", id, class_name, None);
    input.set_attribute("type", "text");
    if let Some(placeholder) = provided(placeholder) {
        input.set_attribute("placeholder", placeholder);
    }
    input
}
