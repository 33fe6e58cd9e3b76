//! Cart views: the counter badge and the floating summary.
//!
//! Both views are projections of a [`Cart`]; rendering replaces the surface
//! contents, so rendering the same cart twice leaves the page unchanged.
//! A page without a given surface simply skips that view.

use std::sync::Arc;

use askama::Template;
use carrito_core::{Cart, CartItem, NumberFormat};
use tracing::debug;

use crate::config::WidgetConfig;
use crate::document::Document;
use crate::scheduler::Scheduler;

/// Summary line display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLineView {
    /// Item name as stored.
    pub name: String,
    /// Units of the item in the cart.
    pub quantity: u32,
    /// Formatted unit price.
    pub price: String,
}

/// Summary display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    /// One entry per cart line, in cart order.
    pub items: Vec<SummaryLineView>,
    /// Formatted sum of every line total.
    pub total: String,
}

impl SummaryView {
    /// Project `cart` using `format` for prices.
    #[must_use]
    pub fn new(cart: &Cart, format: &NumberFormat) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| SummaryLineView::new(item, format))
                .collect(),
            total: cart.total_price().format(format),
        }
    }
}

impl SummaryLineView {
    fn new(item: &CartItem, format: &NumberFormat) -> Self {
        Self {
            name: item.name.to_string(),
            quantity: item.quantity.get(),
            price: item.unit_price.format(format),
        }
    }
}

/// Cart summary fragment template.
#[derive(Template)]
#[template(path = "partials/cart_summary.html")]
pub struct CartSummaryTemplate {
    pub summary: SummaryView,
}

/// Renders cart state into the page.
#[derive(Clone)]
pub struct Renderer {
    config: Arc<WidgetConfig>,
    document: Arc<dyn Document>,
    scheduler: Arc<dyn Scheduler>,
}

impl Renderer {
    /// Create a renderer for `document`.
    pub fn new(
        config: Arc<WidgetConfig>,
        document: Arc<dyn Document>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            config,
            document,
            scheduler,
        }
    }

    /// Render both views.
    pub fn render_all(&self, cart: &Cart) {
        self.render_counter(cart);
        self.render_summary(cart);
    }

    /// Write the total quantity into the counter badge.
    ///
    /// A positive total restarts the bump effect, which removes itself after
    /// the configured duration. Returns `false` if the page has no counter.
    pub fn render_counter(&self, cart: &Cart) -> bool {
        let Some(counter) = self.document.query_selector(&self.config.selectors.counter) else {
            debug!(selector = %self.config.selectors.counter, "No counter on page");
            return false;
        };

        let total = cart.total_quantity();
        self.document.set_text_content(counter, &total.to_string());

        if total > 0 {
            let class = self.config.bump.class.clone();
            self.document.remove_class(counter, &class);
            self.document.add_class(counter, &class);

            let document = Arc::clone(&self.document);
            self.scheduler.schedule(
                self.config.bump.duration,
                Box::new(move || document.remove_class(counter, &class)),
            );
        }
        true
    }

    /// Render the order summary.
    ///
    /// Returns `false` if the page has no summary surface or the template
    /// failed to render; the surface is left untouched in both cases.
    pub fn render_summary(&self, cart: &Cart) -> bool {
        let Some(container) = self.document.query_selector(&self.config.selectors.summary) else {
            debug!(selector = %self.config.selectors.summary, "No summary on page");
            return false;
        };

        match self.summary_html(cart) {
            Ok(html) => {
                self.document.set_inner_html(container, &html);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to render cart summary");
                false
            }
        }
    }

    /// Summary markup for `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn summary_html(&self, cart: &Cart) -> Result<String, askama::Error> {
        CartSummaryTemplate {
            summary: SummaryView::new(cart, &self.config.number_format),
        }
        .render()
    }
}
