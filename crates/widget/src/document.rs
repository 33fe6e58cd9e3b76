//! Page access for the widget.
//!
//! The widget never builds or styles markup itself; it looks up a handful of
//! elements by class selector and updates their content and class list
//! through [`Document`]. [`MemoryDocument`] is an in-process page used by
//! the CLI and by tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

/// Handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

/// The page the widget renders into.
///
/// Selectors are class selectors (`.cart-count`). Operations on an element
/// that no longer exists are no-ops.
pub trait Document: Send + Sync {
    /// First element matching `selector`, in document order.
    fn query_selector(&self, selector: &str) -> Option<ElementId>;

    /// Every element matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<ElementId>;

    /// Value of the `data-<name>` attribute.
    fn data_attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Replace the element's content with plain text.
    fn set_text_content(&self, element: ElementId, text: &str);

    /// Replace the element's content with markup.
    fn set_inner_html(&self, element: ElementId, html: &str);

    /// Add a class to the element.
    fn add_class(&self, element: ElementId, class: &str);

    /// Remove a class from the element.
    fn remove_class(&self, element: ElementId, class: &str);

    /// Append a new element with `class` and text content to the page body.
    ///
    /// Returns `None` when the page has no body to append to.
    fn append_element(&self, class: &str, text: &str) -> Option<ElementId>;

    /// Detach the element from the page.
    fn remove_element(&self, element: ElementId);
}

/// Snapshot of an element of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Class list
    pub classes: BTreeSet<String>,
    /// `data-*` attributes, keyed without the `data-` prefix
    pub data: BTreeMap<String, String>,
    /// Plain text content
    pub text: String,
    /// Markup content
    pub inner_html: String,
}

impl Element {
    /// An element with a single class.
    #[must_use]
    pub fn with_class(class: &str) -> Self {
        Self {
            classes: BTreeSet::from([class.to_string()]),
            ..Self::default()
        }
    }

    /// Set a `data-*` attribute.
    #[must_use]
    pub fn data(mut self, name: &str, value: &str) -> Self {
        self.data.insert(name.to_string(), value.to_string());
        self
    }

    /// Whether the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn matches(&self, selector: &str) -> bool {
        selector
            .strip_prefix('.')
            .is_some_and(|class| self.has_class(class))
    }
}

/// In-process [`Document`].
pub struct MemoryDocument {
    has_body: bool,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    elements: BTreeMap<ElementId, Element>,
}

impl MemoryDocument {
    /// An empty page with a body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            has_body: true,
            state: Mutex::new(State::default()),
        }
    }

    /// An empty page without a body; toasts cannot be shown.
    #[must_use]
    pub fn without_body() -> Self {
        Self {
            has_body: false,
            state: Mutex::new(State::default()),
        }
    }

    /// Add an element to the page.
    pub fn insert(&self, element: Element) -> ElementId {
        let mut state = self.lock();
        let id = ElementId(state.next_id);
        state.next_id += 1;
        state.elements.insert(id, element);
        id
    }

    /// Snapshot of an element, if it is still attached.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.lock().elements.get(&id).cloned()
    }

    /// Snapshots of every attached element matching `selector`.
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<Element> {
        self.lock()
            .elements
            .values()
            .filter(|element| element.matches(selector))
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, id: ElementId, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.lock().elements.get_mut(&id) {
            f(element);
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for MemoryDocument {
    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        self.lock()
            .elements
            .iter()
            .find(|(_, element)| element.matches(selector))
            .map(|(id, _)| *id)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<ElementId> {
        self.lock()
            .elements
            .iter()
            .filter(|(_, element)| element.matches(selector))
            .map(|(id, _)| *id)
            .collect()
    }

    fn data_attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.lock()
            .elements
            .get(&element)
            .and_then(|e| e.data.get(name).cloned())
    }

    fn set_text_content(&self, element: ElementId, text: &str) {
        self.update(element, |e| {
            e.text = text.to_string();
            e.inner_html.clear();
        });
    }

    fn set_inner_html(&self, element: ElementId, html: &str) {
        self.update(element, |e| {
            e.inner_html = html.to_string();
            e.text.clear();
        });
    }

    fn add_class(&self, element: ElementId, class: &str) {
        self.update(element, |e| {
            e.classes.insert(class.to_string());
        });
    }

    fn remove_class(&self, element: ElementId, class: &str) {
        self.update(element, |e| {
            e.classes.remove(class);
        });
    }

    fn append_element(&self, class: &str, text: &str) -> Option<ElementId> {
        if !self.has_body {
            return None;
        }
        let mut element = Element::with_class(class);
        element.text = text.to_string();
        Some(self.insert(element))
    }

    fn remove_element(&self, element: ElementId) {
        self.lock().elements.remove(&element);
    }
}
