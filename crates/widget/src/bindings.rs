//! Event bindings: page load, buy clicks and cross-tab storage events.
//!
//! [`CartWidget`] is the single entry point for everything that happens to
//! the cart on one page. Every handler runs to completion synchronously.
//!
//! # Add-to-cart flow
//!
//! ```text
//! Idle -> Loaded -> Mutated -> Persisted -> Rendered -> Notified -> Idle
//! ```
//!
//! The cart is re-read from the store at the start of every add, so lines
//! added by another tab since this page rendered are kept. Two tabs writing
//! at the same instant still race: the last `save` wins.

use std::sync::Arc;

use carrito_core::{Cart, CartItem, ItemName, Price, Quantity};
use tracing::{debug, error, info, instrument};

use crate::config::{ItemDefaults, WidgetConfig};
use crate::document::{Document, ElementId};
use crate::error::Result;
use crate::notifier::{Notifier, ToastNotifier};
use crate::render::Renderer;
use crate::scheduler::Scheduler;
use crate::storage::{KeyValueStorage, StorageEvent, StorageEvents};
use crate::store::{CartStore, StorageCartStore};

/// `data-*` attribute names read from buy controls.
pub mod attributes {
    /// Item name (`data-nombre`).
    pub const NAME: &str = "nombre";

    /// Unit price (`data-precio`).
    pub const PRICE: &str = "precio";

    /// Units to add (`data-cantidad`).
    pub const QUANTITY: &str = "cantidad";

    /// Image reference (`data-imagen`).
    pub const IMAGE: &str = "imagen";
}

/// Raw item data carried by a buy control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyAttributes {
    /// `data-nombre`, falls back to the configured default name.
    pub name: Option<String>,
    /// `data-precio`, coerced to zero when missing or not a number.
    pub price: Option<String>,
    /// `data-cantidad`, coerced to at least one.
    pub quantity: Option<String>,
    /// `data-imagen`, falls back to the configured default image when empty.
    pub image: Option<String>,
}

impl BuyAttributes {
    /// Read the attributes of `control`.
    pub fn read(document: &dyn Document, control: ElementId) -> Self {
        Self {
            name: document.data_attribute(control, attributes::NAME),
            price: document.data_attribute(control, attributes::PRICE),
            quantity: document.data_attribute(control, attributes::QUANTITY),
            image: document.data_attribute(control, attributes::IMAGE),
        }
    }

    /// Build the cart line these attributes describe.
    ///
    /// Never fails: missing or invalid values fall back to `defaults`, a
    /// zero price or a single unit.
    #[must_use]
    pub fn to_item(&self, defaults: &ItemDefaults) -> CartItem {
        let image = self
            .image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(&defaults.image);

        CartItem::new(
            ItemName::from_attribute(self.name.as_deref(), &defaults.name),
            Price::from_attribute(self.price.as_deref()),
            Quantity::from_attribute(self.quantity.as_deref()),
            image,
        )
    }
}

/// Cart widget bound to one page.
pub struct CartWidget<S> {
    config: Arc<WidgetConfig>,
    store: S,
    document: Arc<dyn Document>,
    renderer: Renderer,
    notifier: Box<dyn Notifier>,
    /// Buy controls with an attached click listener.
    listeners: Vec<ElementId>,
}

impl<K: KeyValueStorage> CartWidget<StorageCartStore<K>> {
    /// Widget persisting to `storage` under the configured key, with toast
    /// notifications.
    pub fn with_storage(
        config: WidgetConfig,
        storage: K,
        document: Arc<dyn Document>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let store = StorageCartStore::new(storage, config.storage_key.clone());
        let notifier = ToastNotifier::new(
            config.toast.clone(),
            Arc::clone(&document),
            Arc::clone(&scheduler),
        );
        Self::new(config, store, document, scheduler, Box::new(notifier))
    }
}

impl<S: CartStore> CartWidget<S> {
    /// Assemble a widget from its collaborators.
    pub fn new(
        config: WidgetConfig,
        store: S,
        document: Arc<dyn Document>,
        scheduler: Arc<dyn Scheduler>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let config = Arc::new(config);
        let renderer = Renderer::new(Arc::clone(&config), Arc::clone(&document), scheduler);
        Self {
            config,
            store,
            document,
            renderer,
            notifier,
            listeners: Vec::new(),
        }
    }

    /// The cart store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The widget configuration.
    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// The persisted cart.
    pub fn cart(&self) -> Cart {
        self.store.load()
    }

    /// Page is ready: render both views and bind the buy controls present.
    pub fn on_page_ready(&mut self) -> Cart {
        let cart = self.render_all();
        let bound = self.bind_buy_controls();
        debug!(bound, items = cart.len(), "Cart widget ready");
        cart
    }

    /// Re-render both views from the persisted cart.
    pub fn render_all(&self) -> Cart {
        let cart = self.store.load();
        self.renderer.render_all(&cart);
        cart
    }

    /// Attach a click listener to every buy control not bound yet.
    ///
    /// Safe to call after the page adds controls: controls bound earlier are
    /// skipped. Returns the number of newly bound controls.
    pub fn bind_buy_controls(&mut self) -> usize {
        let controls = self
            .document
            .query_selector_all(&self.config.selectors.buy_control);
        let mut bound = 0;
        for control in controls {
            if self.listeners.contains(&control) {
                continue;
            }
            self.listeners.push(control);
            bound += 1;
        }
        bound
    }

    /// Whether `control` has a click listener attached.
    #[must_use]
    pub fn is_bound(&self, control: ElementId) -> bool {
        self.listeners.contains(&control)
    }

    /// Dispatch a click on `control` to its attached listeners.
    ///
    /// Returns the cart after the last listener ran, or `None` if the control
    /// has no listener.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart failed.
    pub fn click(&self, control: ElementId) -> Result<Option<Cart>> {
        let mut cart = None;
        for _ in self.listeners.iter().filter(|&&bound| bound == control) {
            let attributes = BuyAttributes::read(self.document.as_ref(), control);
            cart = Some(self.on_buy_clicked(&attributes)?);
        }
        Ok(cart)
    }

    /// Handle a buy action carrying `attributes`.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart failed.
    pub fn on_buy_clicked(&self, attributes: &BuyAttributes) -> Result<Cart> {
        self.add_to_cart(attributes.to_item(&self.config.defaults))
    }

    /// Add `candidate` to the persisted cart, refresh the views and notify.
    ///
    /// When the cart cannot be persisted nothing is rendered or notified.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart failed.
    #[instrument(skip(self, candidate), fields(item = %candidate.name))]
    pub fn add_to_cart(&self, candidate: CartItem) -> Result<Cart> {
        let mut cart = self.store.load();
        let name = candidate.name.clone();
        let quantity = cart.add_item(candidate);

        if let Err(e) = self.store.save(&cart) {
            error!(error = %e, "Failed to persist cart");
            return Err(e);
        }
        info!(
            quantity = quantity.get(),
            total = cart.total_quantity(),
            "Item added to cart"
        );

        self.renderer.render_all(&cart);
        self.notifier.notify(&format!("{name} agregado al carrito"));
        Ok(cart)
    }

    /// Handle a storage change made by another context.
    ///
    /// Changes to the cart entry re-render both views; other keys are
    /// ignored. Returns whether the views were refreshed.
    #[instrument(skip(self, event), fields(key = %event.key))]
    pub fn on_storage_event(&self, event: &StorageEvent) -> bool {
        if event.key != self.config.storage_key {
            return false;
        }
        let cart = self.render_all();
        debug!(total = cart.total_quantity(), "Cart changed in another context");
        true
    }

    /// Drain pending storage events, refreshing the views if any concerned
    /// the cart. Returns the number of refreshes.
    pub fn sync(&self, events: &mut StorageEvents) -> usize {
        let mut refreshed = 0;
        while let Some(event) = events.try_next() {
            if self.on_storage_event(&event) {
                refreshed += 1;
            }
        }
        refreshed
    }
}
