//! End-to-end tests for the carrito cart widget.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p carrito-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `add_to_cart` - Buy controls through to persisted state and views
//! - `cross_tab` - Several pages sharing one origin
//! - `effects` - Counter bump and toast timing
//! - `file_origin` - Pages backed by a shared store file
//!
//! Every test page runs on a [`ManualScheduler`], so effect timing is
//! checked without sleeping.

use std::sync::Arc;

use carrito_widget::document::{Document, Element, ElementId, MemoryDocument};
use carrito_widget::scheduler::{ManualScheduler, Scheduler};
use carrito_widget::storage::KeyValueStorage;
use carrito_widget::{CartWidget, StorageCartStore, WidgetConfig};

/// One open page (tab) with the standard cart surfaces.
pub struct TestPage<K> {
    pub document: Arc<MemoryDocument>,
    pub scheduler: Arc<ManualScheduler>,
    pub counter: ElementId,
    pub summary: ElementId,
    pub widget: CartWidget<StorageCartStore<K>>,
}

impl<K: KeyValueStorage> TestPage<K> {
    /// Open a page over `storage` with the default configuration.
    ///
    /// The widget is constructed but the page is not marked ready; call
    /// [`ready`](Self::ready) once buy controls are in place.
    pub fn open(storage: K) -> Self {
        Self::open_with(WidgetConfig::default(), storage)
    }

    /// Open a page over `storage` with `config`.
    pub fn open_with(config: WidgetConfig, storage: K) -> Self {
        let document = Arc::new(MemoryDocument::new());
        let counter = document.insert(Element::with_class("cart-count"));
        let summary = document.insert(Element::with_class("cart-resumen"));
        let scheduler = Arc::new(ManualScheduler::new());
        let widget = CartWidget::with_storage(
            config,
            storage,
            Arc::clone(&document) as Arc<dyn Document>,
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
        );
        Self {
            document,
            scheduler,
            counter,
            summary,
            widget,
        }
    }

    /// Fire the page-ready handler.
    pub fn ready(&mut self) -> &mut Self {
        self.widget.on_page_ready();
        self
    }

    /// Add a buy control with the given `data-*` attributes.
    pub fn add_button(&self, attributes: &[(&str, &str)]) -> ElementId {
        let element = attributes
            .iter()
            .fold(Element::with_class("btn-comprar"), |element, (name, value)| {
                element.data(name, value)
            });
        self.document.insert(element)
    }

    /// Counter badge text.
    pub fn counter_text(&self) -> String {
        self.document
            .element(self.counter)
            .map(|e| e.text)
            .unwrap_or_default()
    }

    /// Whether the counter currently carries `class`.
    pub fn counter_has_class(&self, class: &str) -> bool {
        self.document
            .element(self.counter)
            .is_some_and(|e| e.has_class(class))
    }

    /// Summary markup.
    pub fn summary_html(&self) -> String {
        self.document
            .element(self.summary)
            .map(|e| e.inner_html)
            .unwrap_or_default()
    }

    /// Messages of the toasts currently on the page.
    pub fn toasts(&self) -> Vec<String> {
        self.document
            .find_all(".toast-cart")
            .into_iter()
            .map(|e| e.text)
            .collect()
    }
}
