//! In-memory page the widget renders into.

use std::sync::Arc;

use carrito_widget::bindings::attributes;
use carrito_widget::document::{Document, Element, ElementId, MemoryDocument};
use carrito_widget::{BuyAttributes, WidgetConfig};

/// A page with a counter, a summary and optionally one buy control.
pub struct Page {
    document: Arc<MemoryDocument>,
    counter: ElementId,
    summary: ElementId,
    buy_control: Option<ElementId>,
}

/// Class name targeted by a `.class` selector.
fn class_of(selector: &str) -> &str {
    selector.trim_start_matches('.')
}

impl Page {
    /// A page with both cart surfaces and no buy control.
    pub fn new(config: &WidgetConfig) -> Self {
        let document = Arc::new(MemoryDocument::new());
        let counter = document.insert(Element::with_class(class_of(&config.selectors.counter)));
        let summary = document.insert(Element::with_class(class_of(&config.selectors.summary)));
        Self {
            document,
            counter,
            summary,
            buy_control: None,
        }
    }

    /// A page with both cart surfaces and a buy control carrying
    /// `attributes`. Absent attributes are left off the control.
    pub fn with_buy_control(config: &WidgetConfig, buy: &BuyAttributes) -> Self {
        let mut page = Self::new(config);
        let fields = [
            (attributes::NAME, &buy.name),
            (attributes::PRICE, &buy.price),
            (attributes::QUANTITY, &buy.quantity),
            (attributes::IMAGE, &buy.image),
        ];
        let control = fields.into_iter().fold(
            Element::with_class(class_of(&config.selectors.buy_control)),
            |element, (name, value)| match value {
                Some(value) => element.data(name, value),
                None => element,
            },
        );
        page.buy_control = Some(page.document.insert(control));
        page
    }

    /// The page as seen by the widget.
    pub fn document(&self) -> Arc<dyn Document> {
        Arc::clone(&self.document) as Arc<dyn Document>
    }

    /// The buy control, if the page has one.
    pub const fn buy_control(&self) -> Option<ElementId> {
        self.buy_control
    }

    /// Current counter badge text.
    pub fn counter_text(&self) -> String {
        self.document
            .element(self.counter)
            .map(|e| e.text)
            .unwrap_or_default()
    }

    /// Current summary markup.
    pub fn summary_html(&self) -> String {
        self.document
            .element(self.summary)
            .map(|e| e.inner_html)
            .unwrap_or_default()
    }

    /// Plain-text rendering of the page surfaces.
    pub fn to_text(&self) -> String {
        format!("Carrito ({})\n{}", self.counter_text(), self.summary_html().trim())
    }
}
